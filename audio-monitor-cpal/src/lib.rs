//! # audio-monitor-cpal
//!
//! Cross-platform capture backend for audio-monitor, built on cpal.
//!
//! Provides:
//! - `CpalCaptureEngine` — microphone capture via the default cpal host
//! - `device` — input device enumeration
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//!
//! use audio_monitor_core::{AudioMonitor, ExternalPowerAssumed, MonitorConfig};
//! use audio_monitor_cpal::CpalCaptureEngine;
//!
//! let config = MonitorConfig::default();
//! let engine = CpalCaptureEngine::new(&config);
//! let monitor = AudioMonitor::new(engine, config, Arc::new(ExternalPowerAssumed))?;
//! monitor.start()?;
//! ```

pub mod device;
pub mod engine;

pub use device::{list_input_devices, InputDevice};
pub use engine::CpalCaptureEngine;
