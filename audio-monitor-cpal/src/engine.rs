//! cpal microphone capture engine.
//!
//! Opens an input stream on the default cpal host and forwards every data
//! callback to the monitor's `RenderHandler`. The stream lives on a
//! dedicated capture thread for its whole lifetime (`cpal::Stream` is not
//! `Send`), controlled by an atomic running flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleFormat, SampleRate, StreamConfig};
use crossbeam_channel::bounded;
use parking_lot::Mutex;

use audio_monitor_core::models::config::MonitorConfig;
use audio_monitor_core::models::error::MonitorError;
use audio_monitor_core::session::render::RenderHandler;
use audio_monitor_core::traits::capture_engine::CaptureEngine;

/// How often the capture thread checks the running flag while the stream is
/// live.
const STOP_POLL: Duration = Duration::from_millis(50);

#[derive(Clone)]
struct StreamParams {
    sample_rate: u32,
    io_buffer_frames: u32,
    max_frames_per_slice: usize,
    input_device: Option<String>,
}

/// Microphone capture via cpal.
pub struct CpalCaptureEngine {
    params: StreamParams,
    running: Arc<AtomicBool>,
    capture_handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl CpalCaptureEngine {
    pub fn new(config: &MonitorConfig) -> Self {
        let io_buffer_frames =
            (config.sample_rate * config.io_buffer_duration.as_secs_f64()).round() as u32;
        Self {
            params: StreamParams {
                sample_rate: config.sample_rate as u32,
                io_buffer_frames: io_buffer_frames.max(1),
                max_frames_per_slice: config.max_frames_per_slice,
                input_device: config.input_device.clone(),
            },
            running: Arc::new(AtomicBool::new(false)),
            capture_handle: Mutex::new(None),
        }
    }
}

impl CaptureEngine for CpalCaptureEngine {
    fn is_available(&self) -> bool {
        cpal::default_host().default_input_device().is_some()
    }

    fn start(&mut self, handler: Arc<RenderHandler>) -> Result<(), MonitorError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(MonitorError::AlreadyRunning);
        }

        // The stream must be built, played, and dropped on one thread;
        // build results are reported back before start returns.
        let (ready_tx, ready_rx) = bounded(1);
        let running = Arc::clone(&self.running);
        let params = self.params.clone();

        let handle = thread::Builder::new()
            .name("cpal-capture".into())
            .spawn(move || match build_stream(&params, handler) {
                Ok(stream) => {
                    if let Err(err) = stream.play() {
                        let _ = ready_tx.send(Err(MonitorError::Unknown(format!(
                            "failed to start input stream: {err}"
                        ))));
                        running.store(false, Ordering::SeqCst);
                        return;
                    }
                    let _ = ready_tx.send(Ok(()));
                    while running.load(Ordering::SeqCst) {
                        thread::sleep(STOP_POLL);
                    }
                    drop(stream);
                }
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                    running.store(false, Ordering::SeqCst);
                }
            })
            .map_err(|err| {
                self.running.store(false, Ordering::SeqCst);
                MonitorError::Unknown(format!("failed to spawn capture thread: {err}"))
            })?;

        *self.capture_handle.lock() = Some(handle);

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                if let Some(handle) = self.capture_handle.lock().take() {
                    let _ = handle.join();
                }
                log::error!("capture setup failed: {err}");
                Err(err)
            }
            Err(_) => {
                self.running.store(false, Ordering::SeqCst);
                Err(MonitorError::Unknown(
                    "capture thread exited before reporting status".into(),
                ))
            }
        }
    }

    fn stop(&mut self) -> Result<(), MonitorError> {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.capture_handle.lock().take() {
            let _ = handle.join();
        }
        Ok(())
    }
}

fn build_stream(
    params: &StreamParams,
    handler: Arc<RenderHandler>,
) -> Result<cpal::Stream, MonitorError> {
    let host = cpal::default_host();

    let device = match &params.input_device {
        Some(name) => host
            .input_devices()
            .map_err(|err| {
                MonitorError::Unknown(format!("failed to enumerate input devices: {err}"))
            })?
            .find(|d| d.name().map(|n| n == *name).unwrap_or(false))
            .ok_or(MonitorError::DeviceNotAvailable)?,
        None => host
            .default_input_device()
            .ok_or(MonitorError::DeviceNotAvailable)?,
    };

    let (channels, sample_rate) = negotiate_format(&device, params.sample_rate)?;
    if sample_rate.0 != params.sample_rate {
        log::warn!(
            "input device cannot run at {} Hz; using {} Hz (pitch values assume the configured rate)",
            params.sample_rate,
            sample_rate.0
        );
    }

    let build = |buffer_size: BufferSize| {
        let handler = Arc::clone(&handler);
        let channel_count = channels as usize;
        let mut mono_scratch: Vec<f32> = Vec::with_capacity(params.max_frames_per_slice);
        let config = StreamConfig {
            channels,
            sample_rate,
            buffer_size,
        };
        device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let frames: &[f32] = if channel_count > 1 {
                    // Interleaved multi-channel input: keep channel 0 only.
                    mono_scratch.clear();
                    mono_scratch.extend(data.iter().step_by(channel_count));
                    &mono_scratch
                } else {
                    data
                };
                // cpal has no status path back to the engine; failures are
                // logged inside the handler.
                let _ = handler.on_render(Ok(frames), &mut []);
            },
            |err| log::error!("input stream error: {err}"),
            None,
        )
    };

    // Prefer the configured I/O buffer duration; not every host honors a
    // fixed size.
    build(BufferSize::Fixed(params.io_buffer_frames))
        .or_else(|err| {
            log::debug!("fixed buffer size rejected ({err}); falling back to host default");
            build(BufferSize::Default)
        })
        .map_err(map_build_error)
}

/// Pick an f32 input format at the requested rate with the fewest channels,
/// falling back to the device default.
fn negotiate_format(
    device: &cpal::Device,
    want_rate: u32,
) -> Result<(u16, SampleRate), MonitorError> {
    if let Ok(configs) = device.supported_input_configs() {
        let mut best: Option<(u16, SampleRate)> = None;
        for range in configs {
            if range.sample_format() != SampleFormat::F32 {
                continue;
            }
            if range.min_sample_rate().0 <= want_rate && range.max_sample_rate().0 >= want_rate {
                let candidate = (range.channels(), SampleRate(want_rate));
                match best {
                    Some((channels, _)) if channels <= candidate.0 => {}
                    _ => best = Some(candidate),
                }
            }
        }
        if let Some(found) = best {
            return Ok(found);
        }
    }

    let default = device.default_input_config().map_err(|err| {
        MonitorError::ConfigurationFailed(format!("no usable input config: {err}"))
    })?;
    if default.sample_format() != SampleFormat::F32 {
        return Err(MonitorError::ConfigurationFailed(format!(
            "device default format is {:?}, expected f32",
            default.sample_format()
        )));
    }
    Ok((default.channels(), default.sample_rate()))
}

fn map_build_error(err: cpal::BuildStreamError) -> MonitorError {
    match err {
        cpal::BuildStreamError::DeviceNotAvailable => MonitorError::DeviceNotAvailable,
        cpal::BuildStreamError::StreamConfigNotSupported => {
            MonitorError::ConfigurationFailed("stream config not supported".into())
        }
        other => MonitorError::Unknown(format!("failed to build input stream: {other}")),
    }
}
