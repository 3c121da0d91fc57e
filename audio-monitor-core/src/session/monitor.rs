use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use parking_lot::Mutex;

use crate::models::config::MonitorConfig;
use crate::models::error::MonitorError;
use crate::models::state::LifecycleEvent;
use crate::models::tone::Tone;
use crate::processing::accumulation::AccumulationBuffer;
use crate::processing::{pitch, volume};
use crate::session::lifecycle::{LifecycleAction, LifecycleContext, LifecycleController};
use crate::session::render::RenderHandler;
use crate::session::sim_tone::ToneOverride;
use crate::traits::capture_engine::{CaptureEngine, ToneUpdateHandler};
use crate::traits::power::PowerMonitor;

/// Heartbeat of the delivery thread; bounds how late the background-disable
/// deadline can be noticed when no render callbacks arrive.
const DELIVERY_TICK: Duration = Duration::from_millis(250);

/// Mutable monitor state shared between the host-facing API and the
/// delivery thread, protected by `parking_lot::Mutex`.
struct SharedState {
    is_running: bool,
    update_handler: Option<ToneUpdateHandler>,
    override_tone: ToneOverride,
    lifecycle: LifecycleController,
}

struct MonitorInner<E: CaptureEngine> {
    engine: Mutex<E>,
    config: MonitorConfig,
    // Written only by the capture thread, snapshotted by the delivery
    // context; both hold the lock just long enough for one bounded copy.
    buffer: Arc<Mutex<AccumulationBuffer>>,
    handler: Arc<RenderHandler>,
    shared: Mutex<SharedState>,
    power: Arc<dyn PowerMonitor>,
}

impl<E: CaptureEngine> MonitorInner<E> {
    fn start_capture(&self) -> Result<(), MonitorError> {
        // The engine lock serializes concurrent start/stop attempts.
        let mut engine = self.engine.lock();
        if self.shared.lock().is_running {
            return Ok(());
        }
        engine.start(Arc::clone(&self.handler))?;
        self.shared.lock().is_running = true;
        Ok(())
    }

    fn stop_capture(&self) -> Result<(), MonitorError> {
        let mut engine = self.engine.lock();
        if !self.shared.lock().is_running {
            return Ok(());
        }
        // The accumulation buffer is left intact: a later start resumes
        // informative analysis within one window of audio.
        engine.stop()?;
        self.shared.lock().is_running = false;
        Ok(())
    }

    fn current_sample(&self) -> Tone {
        if let Some(tone) = self.shared.lock().override_tone.current(Instant::now()) {
            return tone;
        }

        let snapshot = self.buffer.lock().samples().to_vec();
        let pitch_hz = pitch::estimate(
            &snapshot,
            self.config.window_len,
            self.config.sample_rate,
            self.config.autocorrelation_depth,
        );
        let peak = volume::estimate(&snapshot, self.config.window_len);
        Tone::new(pitch_hz, peak)
    }

    fn dispatch_lifecycle(&self, event: LifecycleEvent) {
        let action = {
            let mut shared = self.shared.lock();
            let ctx = LifecycleContext {
                is_running: shared.is_running,
                power: self.power.power_state(),
            };
            shared.lifecycle.on_event(event, ctx)
        };

        match action {
            Some(LifecycleAction::Suspend) => {
                log::info!(
                    "suspending capture: backgrounded and unplugged for {:?}",
                    self.shared.lock().lifecycle.disable_delay()
                );
                if let Err(err) = self.stop_capture() {
                    log::error!("failed to suspend capture: {err}");
                }
            }
            Some(LifecycleAction::Resume) => {
                if let Err(err) = self.start_capture() {
                    log::error!("failed to resume capture: {err}");
                }
            }
            None => {}
        }
    }

    fn service_timers(&self, now: Instant) {
        let due = self
            .shared
            .lock()
            .lifecycle
            .state()
            .armed_deadline()
            .is_some_and(|deadline| now >= deadline);
        if due {
            self.dispatch_lifecycle(LifecycleEvent::TimerFired { now });
        }
    }

    /// Delivery loop: runs the estimators and the host's update handler on
    /// this thread, never on the capture thread, and services the deadline
    /// timers between wakeups.
    fn delivery_loop(self: Arc<Self>, wakeups: Receiver<()>, running: Arc<AtomicBool>) {
        while running.load(Ordering::SeqCst) {
            match wakeups.recv_timeout(DELIVERY_TICK) {
                Ok(()) => {
                    // Coalesce bursts: one delivery covers every pending
                    // render callback.
                    while wakeups.try_recv().is_ok() {}
                    let handler = self.shared.lock().update_handler.clone();
                    if let Some(handler) = handler {
                        handler(self.current_sample());
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.service_timers(Instant::now());
        }
    }
}

/// Composition root: owns the capture engine, the accumulation buffer, the
/// estimators' input path, tone overrides, and the lifecycle machine.
///
/// Data flow:
/// ```text
/// [CaptureEngine] → RenderHandler → AccumulationBuffer
///                        │                 │ snapshot
///                        └ wakeup →  delivery thread → {pitch, volume} → Tone → host handler
/// ```
pub struct AudioMonitor<E: CaptureEngine + 'static> {
    inner: Arc<MonitorInner<E>>,
    delivery_running: Arc<AtomicBool>,
    delivery_handle: Option<thread::JoinHandle<()>>,
}

impl<E: CaptureEngine + 'static> AudioMonitor<E> {
    /// Build a monitor around `engine`. The accumulation buffer is
    /// allocated here, once, and never resized.
    ///
    /// An unavailable engine is not an error: the monitor stays inert and
    /// `start` reports the failure when the host asks for capture.
    pub fn new(
        engine: E,
        config: MonitorConfig,
        power: Arc<dyn PowerMonitor>,
    ) -> Result<Self, MonitorError> {
        config.validate().map_err(MonitorError::ConfigurationFailed)?;

        if !engine.is_available() {
            log::warn!("no capture device available; monitor stays inert until start succeeds");
        }

        let (wakeup_tx, wakeup_rx) = bounded(1);
        let buffer = Arc::new(Mutex::new(AccumulationBuffer::new(config.window_len)));
        let handler = Arc::new(RenderHandler::new(Arc::clone(&buffer), wakeup_tx));

        let inner = Arc::new(MonitorInner {
            engine: Mutex::new(engine),
            shared: Mutex::new(SharedState {
                is_running: false,
                update_handler: None,
                override_tone: ToneOverride::new(config.override_hold),
                lifecycle: LifecycleController::new(config.background_disable_delay),
            }),
            buffer,
            handler,
            power,
            config,
        });

        let delivery_running = Arc::new(AtomicBool::new(true));
        let delivery_handle = thread::Builder::new()
            .name("tone-delivery".into())
            .spawn({
                let inner = Arc::clone(&inner);
                let running = Arc::clone(&delivery_running);
                move || inner.delivery_loop(wakeup_rx, running)
            })
            .map_err(|err| {
                MonitorError::Unknown(format!("failed to spawn delivery thread: {err}"))
            })?;

        Ok(Self {
            inner,
            delivery_running,
            delivery_handle: Some(delivery_handle),
        })
    }

    /// Start collecting data. Idempotent: starting a running monitor is a
    /// no-op.
    pub fn start(&self) -> Result<(), MonitorError> {
        self.inner.start_capture()
    }

    /// Stop collecting data. Idempotent, and not lossy: the accumulation
    /// buffer keeps its contents for the next start.
    pub fn stop(&self) -> Result<(), MonitorError> {
        self.inner.stop_capture()
    }

    pub fn is_running(&self) -> bool {
        self.inner.shared.lock().is_running
    }

    /// The current pitch and volume measurement: the override tone while one
    /// is active, otherwise computed from the latest buffer snapshot.
    pub fn current_sample(&self) -> Tone {
        self.inner.current_sample()
    }

    /// Set the function called on the delivery thread whenever fresh tone
    /// data is available.
    pub fn set_update_handler(&self, handler: impl Fn(Tone) + Send + Sync + 'static) {
        self.inner.shared.lock().update_handler = Some(Arc::new(handler));
    }

    /// Preempt the estimators with `tone` for the override-hold window
    /// (renewable by re-injection).
    pub fn inject_simulated_tone(&self, tone: Tone) {
        self.inner
            .shared
            .lock()
            .override_tone
            .inject(tone, Instant::now());
    }

    pub fn background_disable_delay(&self) -> Duration {
        self.inner.shared.lock().lifecycle.disable_delay()
    }

    pub fn set_background_disable_delay(&self, delay: Duration) {
        self.inner.shared.lock().lifecycle.set_disable_delay(delay);
    }

    /// Host notification: the app moved to the background.
    pub fn entered_background(&self) {
        self.inner.power.begin_observing();
        self.inner
            .dispatch_lifecycle(LifecycleEvent::EnteredBackground {
                now: Instant::now(),
            });
    }

    /// Host notification: the app is returning to the foreground.
    pub fn entering_foreground(&self) {
        self.inner.power.end_observing();
        self.inner
            .dispatch_lifecycle(LifecycleEvent::EnteringForeground);
    }
}

impl<E: CaptureEngine + 'static> Drop for AudioMonitor<E> {
    fn drop(&mut self) {
        if let Err(err) = self.inner.stop_capture() {
            log::error!("failed to stop capture on teardown: {err}");
        }
        self.delivery_running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.delivery_handle.take() {
            let _ = handle.join();
        }
    }
}
