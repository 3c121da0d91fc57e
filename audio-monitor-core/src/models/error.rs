use thiserror::Error;

/// Errors that can occur during tone monitoring.
///
/// None of these are fatal to the host process: setup failures leave the
/// monitor inert, render failures skip one frame batch, and estimator edge
/// cases are reported as 0 Hz rather than as errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MonitorError {
    #[error("recording permission denied")]
    PermissionDenied,

    #[error("no capture device available")]
    DeviceNotAvailable,

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("engine render failed: {0}")]
    RenderFailed(String),

    #[error("capture already running")]
    AlreadyRunning,

    #[error("unknown error: {0}")]
    Unknown(String),
}
