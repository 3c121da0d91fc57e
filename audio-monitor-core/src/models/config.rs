use std::time::Duration;

/// Configuration for a tone monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Capture sample rate in Hz (default: 44100). Negotiated once at setup,
    /// never renegotiated mid-session.
    pub sample_rate: f64,

    /// Analysis window length in samples (default: 16384, ~370 ms at 44.1 kHz).
    pub window_len: usize,

    /// Number of autocorrelation lag values computed per pitch estimate
    /// (default: 512).
    pub autocorrelation_depth: usize,

    /// Preferred I/O buffer duration hint for the capture backend
    /// (default: 5 ms).
    pub io_buffer_duration: Duration,

    /// Upper bound on frames delivered per render callback; sizes backend
    /// scratch buffers (default: 4096).
    pub max_frames_per_slice: usize,

    /// How long the monitor may stay backgrounded and unplugged before
    /// capture is suspended (default: 600 s).
    pub background_disable_delay: Duration,

    /// How long an injected simulated tone preempts the estimators without
    /// renewal (default: 1 s).
    pub override_hold: Duration,

    /// Specific input device name, or None for the system default.
    pub input_device: Option<String>,
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate <= 0.0 {
            return Err("sample rate must be positive".into());
        }
        if self.window_len < 8 {
            return Err(format!("analysis window too short: {}", self.window_len));
        }
        if self.autocorrelation_depth < 3 {
            return Err(format!(
                "autocorrelation depth too small: {}",
                self.autocorrelation_depth
            ));
        }
        // Every lag up to depth must overlap a full half-window of samples.
        if self.autocorrelation_depth + self.window_len / 2 > self.window_len {
            return Err(format!(
                "autocorrelation depth {} exceeds what a {}-sample window can correlate",
                self.autocorrelation_depth, self.window_len
            ));
        }
        if self.max_frames_per_slice == 0 {
            return Err("max frames per slice must be positive".into());
        }
        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            window_len: 16384,
            autocorrelation_depth: 512,
            io_buffer_duration: Duration::from_millis(5),
            max_frames_per_slice: 4096,
            background_disable_delay: Duration::from_secs(600),
            override_hold: Duration::from_secs(1),
            input_device: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(MonitorConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_sample_rate() {
        let config = MonitorConfig {
            sample_rate: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_depth_larger_than_window_allows() {
        let config = MonitorConfig {
            window_len: 512,
            autocorrelation_depth: 512,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_tiny_window() {
        let config = MonitorConfig {
            window_len: 4,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
