//! Input device enumeration via cpal.

use cpal::traits::{DeviceTrait, HostTrait};

use audio_monitor_core::models::error::MonitorError;

/// An input device available for capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDevice {
    pub name: String,
    pub is_default: bool,
}

/// List input devices on the default host.
///
/// Devices whose names cannot be read are skipped rather than failing the
/// whole enumeration.
pub fn list_input_devices() -> Result<Vec<InputDevice>, MonitorError> {
    let host = cpal::default_host();
    let default_name = host.default_input_device().and_then(|d| d.name().ok());

    let devices = host.input_devices().map_err(|err| {
        MonitorError::Unknown(format!("failed to enumerate input devices: {err}"))
    })?;

    let mut sources = Vec::new();
    for device in devices {
        let Ok(name) = device.name() else { continue };
        let is_default = default_name.as_deref() == Some(name.as_str());
        sources.push(InputDevice { name, is_default });
    }
    Ok(sources)
}

/// Name of the system default input device, if one exists.
pub fn default_input_device_name() -> Option<String> {
    cpal::default_host()
        .default_input_device()
        .and_then(|d| d.name().ok())
}
