//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter              | Implements   | Connects to                     |
//! |----------------------|--------------|---------------------------------|
//! | `config_file`        | ConfigPort   | JSON document on disk           |
//! | `log_sink`           | EventSink    | `log` facade                    |
//! | `loopback`           | Transport    | In-process companion link       |
//! | `recording_renderer` | Renderer     | Draw-command recorder           |
//! | `system_clock`       | ClockPort    | Host local time (`chrono`)      |

pub mod config_file;
pub mod log_sink;
pub mod loopback;
pub mod recording_renderer;
pub mod system_clock;
