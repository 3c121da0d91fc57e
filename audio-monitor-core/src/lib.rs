//! # audio-monitor-core
//!
//! Platform-agnostic microphone tone monitoring core.
//!
//! Continuously derives a pitch (fundamental frequency) and volume (peak
//! amplitude) measurement pair from live microphone audio, in near real
//! time. Platform capture backends implement the `CaptureEngine` trait and
//! plug into the generic `AudioMonitor`.
//!
//! ## Architecture
//!
//! ```text
//! audio-monitor-core (this crate)
//! ├── traits/       ← CaptureEngine, PowerMonitor
//! ├── models/       ← Tone, MonitorConfig, MonitorError, lifecycle states
//! ├── processing/   ← AccumulationBuffer, pitch + volume estimators
//! └── session/      ← AudioMonitor facade, render handler, lifecycle, overrides
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::MonitorConfig;
pub use models::error::MonitorError;
pub use models::state::{LifecycleEvent, LifecycleState, PowerState};
pub use models::tone::Tone;
pub use processing::accumulation::AccumulationBuffer;
pub use session::lifecycle::{LifecycleAction, LifecycleContext, LifecycleController};
pub use session::monitor::AudioMonitor;
pub use session::render::RenderHandler;
pub use session::sim_tone::ToneOverride;
pub use traits::capture_engine::{CaptureEngine, ToneUpdateHandler};
pub use traits::power::{ExternalPowerAssumed, PowerMonitor};
