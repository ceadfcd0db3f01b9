//! Session lifecycle, weather requests and reconnect backoff.

use sunface::app::events::FaceEvent;
use sunface::app::ports::ConnectionEvent;
use sunface::connectivity::ConnectionState;
use sunface::render::Indicator;
use sunface::sync::data::{UUID_CODE_KEY, WEATHER_PATH};

use crate::mock_ports::{engine, engine_with, MockTransport, T0};

use crate::mock_ports::TransportCall::{AddListener, Connect, Disconnect, Put, RemoveListener};

#[test]
fn connect_registers_then_requests_weather() {
    let (mut e, mut sink) = engine();
    e.on_visibility_changed(true, &mut sink);

    let t = e.channel().transport();
    assert_eq!(t.calls, vec![Connect, AddListener, Put]);
    assert_eq!(t.published.len(), 1);
    assert_eq!(t.published[0].path, WEATHER_PATH);
    assert!(t.published[0].data.get_string(UUID_CODE_KEY).is_some());
    assert_eq!(e.connection_state(), ConnectionState::Connected);
    assert!(sink.events.contains(&FaceEvent::ConnectivityChanged {
        from: ConnectionState::Disconnected,
        to: ConnectionState::Connected,
    }));
}

#[test]
fn every_request_carries_a_fresh_token() {
    let (mut e, mut sink) = engine();
    e.on_visibility_changed(true, &mut sink);
    e.on_visibility_changed(false, &mut sink);
    e.on_visibility_changed(true, &mut sink);
    let published = &e.channel().transport().published;
    assert_eq!(published.len(), 2);
    assert_ne!(published[0], published[1]);
}

#[test]
fn hide_unregisters_before_disconnecting() {
    let (mut e, mut sink) = engine();
    e.on_visibility_changed(true, &mut sink);
    e.on_visibility_changed(false, &mut sink);
    assert_eq!(
        e.channel().transport().calls[3..],
        [RemoveListener, Disconnect]
    );
    assert_eq!(e.connection_state(), ConnectionState::Disconnected);
}

#[test]
fn hide_without_session_still_disconnects_safely() {
    let (mut e, mut sink) = engine();
    e.on_visibility_changed(false, &mut sink);
    assert_eq!(e.channel().transport().calls, vec![Disconnect]);
    assert_eq!(e.connection_state(), ConnectionState::Disconnected);
}

#[test]
fn repeated_show_keeps_one_listener() {
    let (mut e, mut sink) = engine();
    e.on_visibility_changed(true, &mut sink);
    e.on_visibility_changed(true, &mut sink);
    e.channel_mut().register_listener();
    assert_eq!(e.channel().transport().count(AddListener), 1);
}

#[test]
fn failed_connect_backs_off_then_recovers() {
    let (mut e, mut sink) = engine_with(MockTransport::failing(2));
    e.on_visibility_changed(true, &mut sink);
    assert_eq!(e.connection_state(), ConnectionState::Failed);
    assert!(e.connectivity_degraded());

    e.poll(T0, &mut sink);
    assert!(e.renderer().last_frame_has_indicator(Indicator::ConnectivityDegraded));
    assert_eq!(e.channel().next_deadline(), Some(T0 + 1_000));

    e.poll(T0 + 1_000, &mut sink);
    assert_eq!(e.channel().transport().count(Connect), 2);
    assert_eq!(e.channel().next_deadline(), Some(T0 + 3_000));

    e.poll(T0 + 3_000, &mut sink);
    assert_eq!(e.connection_state(), ConnectionState::Connected);
    assert!(!e.connectivity_degraded());
    assert!(!e.renderer().last_frame_has_indicator(Indicator::ConnectivityDegraded));
    assert_eq!(e.channel().transport().published.len(), 1);
}

#[test]
fn retry_budget_exhaustion_leaves_face_degraded() {
    let (mut e, mut sink) = engine_with(MockTransport::failing(u32::MAX));
    e.on_visibility_changed(true, &mut sink);

    let mut now = T0;
    while let Some(at) = e.channel().next_deadline() {
        now = at;
        e.poll(now, &mut sink);
    }

    // Initial attempt plus three retries.
    assert_eq!(e.channel().transport().count(Connect), 4);
    assert_eq!(e.connection_state(), ConnectionState::Failed);
    assert!(e.connectivity_degraded());

    // The face keeps ticking, with the indicator, and stops retrying.
    e.poll(now + 60_000, &mut sink);
    assert_eq!(e.channel().transport().count(Connect), 4);
    assert!(e.renderer().last_frame_has_indicator(Indicator::ConnectivityDegraded));
}

#[test]
fn indicator_is_not_drawn_in_ambient() {
    let (mut e, mut sink) = engine_with(MockTransport::failing(u32::MAX));
    e.on_visibility_changed(true, &mut sink);
    e.on_ambient_mode_changed(true, &mut sink);
    e.poll(T0, &mut sink);
    assert!(e.connectivity_degraded());
    assert!(!e.renderer().last_frame_has_indicator(Indicator::ConnectivityDegraded));
}

#[test]
fn suspension_reconnects_and_asks_again() {
    let (mut e, mut sink) = engine();
    e.on_visibility_changed(true, &mut sink);
    e.poll(T0, &mut sink);

    e.channel_mut()
        .transport_mut()
        .events
        .push_back(ConnectionEvent::Suspended);
    e.poll(T0 + 100, &mut sink);
    assert_eq!(e.connection_state(), ConnectionState::Suspended);
    assert!(e.renderer().last_frame_has_indicator(Indicator::ConnectivityDegraded));

    e.poll(T0 + 1_100, &mut sink);
    assert_eq!(e.connection_state(), ConnectionState::Connected);
    assert_eq!(e.channel().transport().published.len(), 2);
    assert_eq!(e.channel().transport().count(AddListener), 1);
}

#[test]
fn hide_cancels_pending_retry() {
    let (mut e, mut sink) = engine_with(MockTransport::failing(u32::MAX));
    e.on_visibility_changed(true, &mut sink);
    assert!(e.channel().next_deadline().is_some());

    e.on_visibility_changed(false, &mut sink);
    assert_eq!(e.channel().next_deadline(), None);
    assert_eq!(e.poll(T0 + 10_000, &mut sink), None);
    assert_eq!(e.channel().transport().count(Connect), 1);
}
