use std::sync::Arc;

use crate::models::error::MonitorError;
use crate::models::tone::Tone;
use crate::session::render::RenderHandler;

/// Callback invoked with each fresh measurement.
///
/// Always runs on the monitor's delivery thread, never on the real-time
/// capture thread. Implementations should marshal to a UI thread if needed.
pub type ToneUpdateHandler = Arc<dyn Fn(Tone) + Send + Sync + 'static>;

/// Interface for platform audio capture engines.
///
/// Implemented by:
/// - `CpalCaptureEngine` (audio-monitor-cpal, cross-platform)
/// - Test doubles feeding synthetic frames
pub trait CaptureEngine: Send {
    /// Whether a capture device is currently available.
    fn is_available(&self) -> bool;

    /// Start capturing, invoking `handler.on_render` synchronously for every
    /// processing quantum on the engine's capture thread.
    ///
    /// The handler is a typed, shared binding — engines must never smuggle it
    /// through an untyped context pointer.
    fn start(&mut self, handler: Arc<RenderHandler>) -> Result<(), MonitorError>;

    /// Stop capturing and release engine resources. Must not disturb any
    /// state held by the handler.
    fn stop(&mut self) -> Result<(), MonitorError>;
}
