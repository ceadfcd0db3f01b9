//! Visibility, ambient and timer behaviour of the engine.

use chrono::FixedOffset;
use sunface::adapters::recording_renderer::{DrawCommand, RecordingRenderer};
use sunface::app::engine::FaceEngine;
use sunface::app::events::FaceEvent;
use sunface::app::ports::ConfigError;
use sunface::fsm::FaceState;
use sunface::render::{Shape, TextRole};
use sunface::sync::icons::WeatherIconTable;
use sunface::Error;

use crate::mock_ports::{engine, test_config, MockClock, MockTransport, T0};

#[test]
fn first_tick_is_immediate_then_aligned() {
    let (mut e, mut sink) = engine();
    e.on_visibility_changed(true, &mut sink);

    assert_eq!(e.poll(T0, &mut sink), Some(T0 + 700));
    assert_eq!(e.renderer().frames(), 1);

    // Nothing due before the boundary.
    assert_eq!(e.poll(T0 + 400, &mut sink), Some(T0 + 700));
    assert_eq!(e.renderer().frames(), 1);

    assert_eq!(e.poll(T0 + 700, &mut sink), Some(T0 + 1_700));
    assert_eq!(e.renderer().frames(), 2);
}

#[test]
fn late_tick_realigns_to_boundary() {
    let (mut e, mut sink) = engine();
    e.on_visibility_changed(true, &mut sink);
    e.poll(T0, &mut sink);
    // Loop stalled for 1.45 s; next tick still lands on a whole second.
    assert_eq!(e.poll(T0 + 1_450, &mut sink), Some(T0 + 1_700));
}

#[test]
fn frame_shows_time_and_date() {
    let (mut e, mut sink) = engine();
    e.on_visibility_changed(true, &mut sink);
    e.poll(T0, &mut sink);
    assert_eq!(e.renderer().last_frame_texts(), vec!["9:05", "SAT, MAR 2024"]);
}

#[test]
fn ambient_cancels_timer_and_blacks_out() {
    let (mut e, mut sink) = engine();
    e.on_visibility_changed(true, &mut sink);
    e.poll(T0, &mut sink);

    e.on_ambient_mode_changed(true, &mut sink);
    assert_eq!(e.state(), FaceState::VisibleAmbient);
    assert!(!e.timer().is_running());
    assert!(e.is_redraw_scheduled());

    assert_eq!(e.poll(T0 + 100, &mut sink), None);
    assert_eq!(e.renderer().last_frame()[0], DrawCommand::Background((0, 0, 0)));
    assert!(sink.events.contains(&FaceEvent::StateChanged {
        from: FaceState::VisibleInteractive,
        to: FaceState::VisibleAmbient,
    }));

    // Minute ticks still redraw in ambient.
    e.on_time_tick();
    e.poll(T0 + 60_000, &mut sink);
    assert_eq!(e.renderer().frames(), 3);

    e.on_ambient_mode_changed(false, &mut sink);
    assert!(e.timer().is_running());
}

#[test]
fn low_bit_ambient_draws_aliased_text() {
    let (mut e, mut sink) = engine();
    e.on_properties_changed(true);
    e.on_visibility_changed(true, &mut sink);
    e.on_ambient_mode_changed(true, &mut sink);
    e.poll(T0, &mut sink);

    let aliased = e.renderer().last_frame().iter().all(|c| match c {
        DrawCommand::Text { anti_alias, .. } => !anti_alias,
        _ => true,
    });
    assert!(aliased);
}

#[test]
fn full_colour_ambient_keeps_anti_alias() {
    let (mut e, mut sink) = engine();
    e.on_properties_changed(false);
    e.on_visibility_changed(true, &mut sink);
    e.on_ambient_mode_changed(true, &mut sink);
    assert!(e.paints().anti_alias());
}

#[test]
fn hidden_face_never_draws() {
    let (mut e, mut sink) = engine();
    e.on_visibility_changed(true, &mut sink);
    e.poll(T0, &mut sink);
    e.on_visibility_changed(false, &mut sink);
    assert_eq!(e.state(), FaceState::Hidden);
    assert!(!e.timer().is_running());

    e.on_time_tick();
    e.invalidate();
    e.on_ambient_mode_changed(true, &mut sink);
    for t in 1..10 {
        e.poll(T0 + t * 1_000, &mut sink);
    }
    assert_eq!(e.renderer().frames(), 1);
    assert_eq!(sink.frames().count(), 1);
}

#[test]
fn ambient_flip_while_hidden_applies_on_show() {
    let (mut e, mut sink) = engine();
    e.on_ambient_mode_changed(true, &mut sink);
    assert_eq!(e.state(), FaceState::Hidden);
    e.on_visibility_changed(true, &mut sink);
    assert_eq!(e.state(), FaceState::VisibleAmbient);
    assert!(!e.timer().is_running());
}

#[test]
fn time_zone_observer_registered_once() {
    let (mut e, mut sink) = engine();
    e.on_visibility_changed(true, &mut sink);
    e.on_visibility_changed(true, &mut sink);
    assert_eq!(e.clock().watch_calls, 1);

    e.on_visibility_changed(false, &mut sink);
    e.on_visibility_changed(false, &mut sink);
    assert_eq!(e.clock().unwatch_calls, 1);
}

#[test]
fn time_zone_change_moves_the_clock() {
    let (mut e, mut sink) = engine();
    e.on_visibility_changed(true, &mut sink);
    e.poll(T0, &mut sink);

    e.clock_mut().offset = FixedOffset::east_opt(2 * 3_600).unwrap();
    e.on_time_zone_changed();
    e.poll(T0 + 10, &mut sink);
    assert_eq!(e.renderer().last_frame_texts()[0], "11:05");
}

#[test]
fn insets_pick_shape_dimensions() {
    let (mut e, mut sink) = engine();
    e.on_apply_window_insets(Shape::Round);
    e.on_visibility_changed(true, &mut sink);
    e.poll(T0, &mut sink);
    let round_time_x = time_x(e.renderer().last_frame());

    e.on_apply_window_insets(Shape::Rectangular);
    e.invalidate();
    e.poll(T0 + 10, &mut sink);
    let rect_time_x = time_x(e.renderer().last_frame());

    // Larger round text is wider, so it starts further left.
    assert!(round_time_x < rect_time_x);
}

fn time_x(frame: &[DrawCommand]) -> f32 {
    frame
        .iter()
        .find_map(|c| match c {
            DrawCommand::Text {
                at,
                role: TextRole::Time,
                ..
            } => Some(at.x),
            _ => None,
        })
        .unwrap()
}

#[test]
fn destroy_tears_everything_down() {
    let (mut e, mut sink) = engine();
    e.on_visibility_changed(true, &mut sink);
    e.on_destroy(&mut sink);
    assert!(!e.timer().is_running());
    assert!(!e.channel().transport().connected);
    assert!(e.channel().transport().listener.is_none());
    assert_eq!(sink.events.last(), Some(&FaceEvent::Destroyed));
    assert_eq!(e.poll(T0 + 5_000, &mut sink), None);
}

#[test]
fn shown_in_ambient_draws_without_the_timer() {
    let (mut e, mut sink) = engine();
    e.on_ambient_mode_changed(true, &mut sink);
    e.on_visibility_changed(true, &mut sink);
    assert_eq!(e.state(), FaceState::VisibleAmbient);
    assert!(!e.timer().is_running());

    e.poll(T0 + 10, &mut sink);
    assert_eq!(e.renderer().frames(), 1);
    assert_eq!(e.renderer().last_frame()[0], DrawCommand::Background((0, 0, 0)));
}

#[test]
fn hide_show_cycle_in_ambient_redraws() {
    let (mut e, mut sink) = engine();
    e.on_visibility_changed(true, &mut sink);
    e.on_ambient_mode_changed(true, &mut sink);
    e.poll(T0, &mut sink);
    let before = e.renderer().frames();

    e.on_visibility_changed(false, &mut sink);
    e.on_visibility_changed(true, &mut sink);
    e.poll(T0 + 30_000, &mut sink);
    assert_eq!(e.renderer().frames(), before + 1);
}

#[test]
fn invalid_retry_policy_is_rejected_at_construction() {
    let mut config = test_config();
    config.retry.jitter_percent = 150;
    let result = FaceEngine::new(
        config,
        RecordingRenderer::new(),
        MockTransport::failing(5),
        MockClock::at(T0),
        WeatherIconTable,
    );
    assert!(matches!(result, Err(Error::Config(ConfigError::ValidationFailed(_)))));
}
