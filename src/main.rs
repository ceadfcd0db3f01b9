//! Sunface demo: a headless face driven by a simulated companion.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  RecordingRenderer  LoopbackTransport  SystemClock           │
//! │  (Renderer)         (Transport)        (ClockPort)           │
//! │  LogEventSink       JsonFileConfig                           │
//! │  (EventSink)        (ConfigPort)                             │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ─────────────────       │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │            FaceEngine (pure logic)                 │      │
//! │  │  FSM · TickTimer · ConnectivityChannel             │      │
//! │  └────────────────────────────────────────────────────┘      │
//! │                                                              │
//! │  companion thread: ResyncListener → DemoSyncJob → push       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `sunface [CONFIG.json] [SECONDS]`

#![deny(unused_must_use)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use env_logger::{Builder, Env};
use log::{info, warn};

use sunface::adapters::config_file::JsonFileConfig;
use sunface::adapters::log_sink::LogEventSink;
use sunface::adapters::loopback::{LoopbackCompanion, LoopbackTransport};
use sunface::adapters::recording_renderer::RecordingRenderer;
use sunface::adapters::system_clock::SystemClock;
use sunface::app::engine::FaceEngine;
use sunface::app::ports::{ClockPort, ConfigPort, DataListener};
use sunface::companion::{weather_details_item, ResyncListener, SyncJob, WeatherReport};
use sunface::config::FaceConfig;
use sunface::render::Shape;
use sunface::sync::data::DataEvent;
use sunface::sync::icons::WeatherIconTable;

const DEFAULT_RUN_SECS: u64 = 12;
/// Longest the loop sleeps when nothing is scheduled.
const IDLE_WAIT_MS: i64 = 250;

// ── Simulated phone ───────────────────────────────────────────

/// Answers every resync with the next canned forecast.
struct DemoSyncJob {
    companion: LoopbackCompanion,
    next: AtomicUsize,
}

const FORECASTS: [WeatherReport; 3] = [
    WeatherReport { max_temp: 72.0, min_temp: 54.0, weather_id: 800 },
    WeatherReport { max_temp: 61.4, min_temp: 48.8, weather_id: 502 },
    WeatherReport { max_temp: 33.0, min_temp: 25.0, weather_id: 601 },
];

impl SyncJob for DemoSyncJob {
    fn sync_now(&self) {
        let i = self.next.fetch_add(1, Ordering::Relaxed) % FORECASTS.len();
        self.companion.push(vec![weather_details_item(&FORECASTS[i])]);
    }
}

fn spawn_companion(
    companion: LoopbackCompanion,
    stop: Arc<AtomicBool>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("companion".into())
        .spawn(move || {
            let listener = ResyncListener::new(DemoSyncJob {
                companion: companion.clone(),
                next: AtomicUsize::new(0),
            });
            while !stop.load(Ordering::Relaxed) {
                if let Some(item) = companion.next_request(Duration::from_millis(100)) {
                    listener.on_data_changed(&[DataEvent::changed(item)]);
                }
            }
            info!("Companion: {} resyncs served", listener.triggered());
        })
}

// ── Entry point ───────────────────────────────────────────────

fn load_config(path: Option<&str>) -> sunface::Result<FaceConfig> {
    match path {
        Some(p) => Ok(JsonFileConfig::new(p).load()?),
        None => Ok(FaceConfig::default()),
    }
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str)).context("loading face config")?;
    let run_secs = match args.get(1) {
        Some(s) => s.parse().context("SECONDS must be an integer")?,
        None => DEFAULT_RUN_SECS,
    };
    info!("Sunface demo starting ({}s, {} ms ticks)", run_secs, config.interactive_update_rate_ms);

    let (transport, companion) = LoopbackTransport::pair().context("starting loopback link")?;
    let stop = Arc::new(AtomicBool::new(false));
    let companion_thread = spawn_companion(companion.clone(), Arc::clone(&stop))?;

    let mut sink = LogEventSink::new();
    let mut engine = FaceEngine::new(
        config,
        RecordingRenderer::new(),
        transport,
        SystemClock::new(),
        WeatherIconTable,
    )
    .context("building face engine")?;

    engine.on_create(&mut sink);
    engine.on_properties_changed(false);
    engine.on_apply_window_insets(Shape::Round);
    engine.on_visibility_changed(true, &mut sink);

    let start = engine.clock().now_millis();
    let end = start + (run_secs as i64) * 1_000;
    let third = (end - start) / 3;
    let mut suspended = false;
    let mut restored = false;
    let mut ambient = false;
    let mut minute = start / 60_000;

    loop {
        let now = engine.clock().now_millis();
        if now >= end {
            break;
        }
        if engine.clock_mut().zone_changed() {
            engine.on_time_zone_changed();
        }

        // Scripted scenario: drop the phone link, bring it back, then doze.
        let elapsed = now - start;
        if !suspended && elapsed >= third {
            warn!("Demo: phone out of range");
            companion.suspend();
            suspended = true;
        }
        if suspended && !restored && elapsed >= third + 2_000 {
            info!("Demo: phone back in range");
            companion.restore();
            restored = true;
        }
        if !ambient && elapsed >= 2 * third {
            engine.on_ambient_mode_changed(true, &mut sink);
            ambient = true;
        }
        if now / 60_000 != minute {
            minute = now / 60_000;
            engine.on_time_tick();
        }

        let frames = engine.renderer().frames();
        let next = engine.poll(now, &mut sink);
        if engine.renderer().frames() != frames {
            info!("FACE  | {}", engine.renderer().last_frame_texts().join(" | "));
        }
        engine.renderer_mut().clear();

        let wait = next.map_or(IDLE_WAIT_MS, |t| (t - now).clamp(1, IDLE_WAIT_MS));
        thread::sleep(Duration::from_millis(wait as u64));
    }

    engine.on_visibility_changed(false, &mut sink);
    engine.on_destroy(&mut sink);
    stop.store(true, Ordering::Relaxed);
    if companion_thread.join().is_err() {
        warn!("Demo: companion thread panicked");
    }
    info!("Sunface demo done: {} events", sink.emitted());
    Ok(())
}
