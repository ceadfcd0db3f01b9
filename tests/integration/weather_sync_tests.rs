//! Weather payloads from the companion through to the drawn frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use sunface::adapters::recording_renderer::DrawCommand;
use sunface::app::events::FaceEvent;
use sunface::app::ports::DataListener;
use sunface::companion::{weather_details_item, WeatherReport};
use sunface::sync::data::{
    DataEvent, DataItem, DataMap, MAX_TEMP_KEY, MIN_TEMP_KEY, WEATHER_DETAILS_PATH,
    WEATHER_ID_KEY, WEATHER_PATH,
};
use sunface::sync::{IconId, WeatherSnapshot};

use crate::mock_ports::{engine, TestEngine, VecSink, T0};

fn details(max: Option<&str>, min: Option<&str>, id: Option<i32>) -> DataEvent {
    let mut m = DataMap::new();
    if let Some(v) = max {
        m.put_string(MAX_TEMP_KEY, v);
    }
    if let Some(v) = min {
        m.put_string(MIN_TEMP_KEY, v);
    }
    if let Some(v) = id {
        m.put_int(WEATHER_ID_KEY, v);
    }
    DataEvent::changed(DataItem::with_data(WEATHER_DETAILS_PATH, m))
}

fn shown() -> (TestEngine, VecSink) {
    let (mut e, mut sink) = engine();
    e.on_visibility_changed(true, &mut sink);
    e.poll(T0, &mut sink);
    (e, sink)
}

fn icons(e: &TestEngine) -> Vec<IconId> {
    e.renderer()
        .last_frame()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Icon { icon, .. } => Some(*icon),
            _ => None,
        })
        .collect()
}

#[test]
fn clear_sky_payload_is_rendered() {
    let (mut e, mut sink) = shown();
    assert!(e.channel().transport().deliver(&[details(Some("72°"), Some("54°"), Some(800))]));

    // The redraw request lands before the next tick is due.
    e.poll(T0 + 50, &mut sink);
    assert_eq!(
        e.weather(),
        &WeatherSnapshot {
            high_temp: Some("72°".into()),
            low_temp: Some("54°".into()),
            icon: Some(IconId::Clear),
        }
    );
    assert_eq!(e.renderer().frames(), 2);
    assert_eq!(e.renderer().last_frame_texts(), vec!["9:05", "SAT, MAR 2024", "72°", "54°"]);
    assert_eq!(icons(&e), vec![IconId::Clear]);
    assert!(sink.events.contains(&FaceEvent::FrameDrawn {
        ambient: false,
        weather_drawn: true,
    }));
}

#[test]
fn unknown_condition_draws_temperatures_only() {
    let (mut e, mut sink) = shown();
    e.channel().transport().deliver(&[details(Some("60°"), Some("40°"), Some(-1))]);
    e.poll(T0 + 50, &mut sink);
    assert_eq!(e.weather().icon, None);
    assert!(icons(&e).is_empty());
    assert_eq!(e.renderer().last_frame_texts()[2..], ["60°", "40°"]);
}

#[test]
fn unmapped_code_behaves_like_unknown() {
    let (mut e, mut sink) = shown();
    e.channel().transport().deliver(&[details(Some("1°"), Some("0°"), Some(999))]);
    e.poll(T0 + 50, &mut sink);
    assert_eq!(e.weather().icon, None);
}

#[test]
fn partial_payload_renders_blank_fields() {
    let (mut e, mut sink) = shown();
    e.channel().transport().deliver(&[details(None, Some("40°"), None)]);
    e.poll(T0 + 50, &mut sink);
    assert_eq!(e.renderer().last_frame_texts()[2..], ["40°"]);
}

#[test]
fn snapshot_is_replaced_wholesale() {
    let (mut e, mut sink) = shown();
    e.channel().transport().deliver(&[details(Some("72°"), Some("54°"), Some(800))]);
    e.poll(T0 + 50, &mut sink);
    e.channel().transport().deliver(&[details(None, Some("50°"), None)]);
    e.poll(T0 + 60, &mut sink);
    assert_eq!(e.weather().high_temp, None);
    assert_eq!(e.weather().low_temp.as_deref(), Some("50°"));
    assert_eq!(e.weather().icon, None);
}

#[test]
fn missing_icon_resource_still_draws_temperatures() {
    let (mut e, mut sink) = shown();
    e.renderer_mut().set_missing_icons(true);
    e.channel().transport().deliver(&[details(Some("72°"), Some("54°"), Some(800))]);
    e.poll(T0 + 50, &mut sink);
    assert!(icons(&e).is_empty());
    assert_eq!(e.renderer().last_frame_texts()[2..], ["72°", "54°"]);
}

#[test]
fn other_paths_and_deletions_are_ignored() {
    let (mut e, mut sink) = shown();
    e.channel().transport().deliver(&[
        DataEvent::changed(DataItem::new(WEATHER_PATH)),
        DataEvent::deleted(WEATHER_DETAILS_PATH),
    ]);
    e.poll(T0 + 50, &mut sink);
    assert!(e.weather().is_unset());
    assert_eq!(e.renderer().frames(), 1);
}

#[test]
fn ambient_stores_weather_but_does_not_draw_it() {
    let (mut e, mut sink) = shown();
    e.on_ambient_mode_changed(true, &mut sink);
    e.channel().transport().deliver(&[details(Some("72°"), Some("54°"), Some(800))]);
    e.poll(T0 + 50, &mut sink);
    assert_eq!(e.weather().icon, Some(IconId::Clear));
    assert_eq!(e.renderer().last_frame_texts(), vec!["9:05", "SAT, MAR 2024"]);
    assert!(icons(&e).is_empty());
}

#[test]
fn snapshot_arriving_while_hidden_shows_after_return() {
    let (mut e, mut sink) = shown();
    let listener = e.channel().transport().listener.clone().unwrap();
    e.on_visibility_changed(false, &mut sink);

    listener.on_data_changed(&[details(Some("72°"), Some("54°"), Some(800))]);
    e.poll(T0 + 1_000, &mut sink);
    assert_eq!(e.renderer().frames(), 1);
    assert_eq!(e.weather().high_temp.as_deref(), Some("72°"));

    e.on_visibility_changed(true, &mut sink);
    e.poll(T0 + 2_000, &mut sink);
    assert_eq!(e.renderer().frames(), 2);
    assert!(e.renderer().last_frame_texts().contains(&"72°"));
}

#[test]
fn companion_builder_round_trips() {
    let (mut e, mut sink) = shown();
    let item = weather_details_item(&WeatherReport {
        max_temp: 33.2,
        min_temp: 25.0,
        weather_id: 601,
    });
    e.channel().transport().deliver(&[DataEvent::changed(item)]);
    e.poll(T0 + 50, &mut sink);
    assert_eq!(e.weather().high_temp.as_deref(), Some("33°"));
    assert_eq!(e.weather().icon, Some(IconId::Snow));
}

#[test]
fn render_loop_never_sees_a_torn_snapshot() {
    let (mut e, mut sink) = shown();
    let listener = e.channel().transport().listener.clone().unwrap();
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for i in 0..2_000 {
                let v = format!("{i}°");
                listener.on_data_changed(&[details(Some(v.as_str()), Some(v.as_str()), Some(800))]);
            }
            done.store(true, Ordering::SeqCst);
        })
    };

    let mut t = T0;
    while !done.load(Ordering::SeqCst) {
        t += 1;
        e.poll(t, &mut sink);
        let w = e.weather();
        assert_eq!(w.high_temp, w.low_temp);
    }
    writer.join().unwrap();
    e.poll(t + 1, &mut sink);
    assert_eq!(e.weather().high_temp.as_deref(), Some("1999°"));
}
