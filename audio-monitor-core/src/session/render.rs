use std::sync::Arc;

use crossbeam_channel::Sender;
use parking_lot::Mutex;

use crate::models::error::MonitorError;
use crate::processing::accumulation::AccumulationBuffer;

/// The real-time capture boundary.
///
/// Invoked synchronously by the capture engine for every processing quantum,
/// on the engine's time-critical thread. Nothing here may block, allocate,
/// or run the estimators; the engine owns the latency deadline.
pub struct RenderHandler {
    buffer: Arc<Mutex<AccumulationBuffer>>,
    delivery: Sender<()>,
}

impl RenderHandler {
    pub(crate) fn new(buffer: Arc<Mutex<AccumulationBuffer>>, delivery: Sender<()>) -> Self {
        Self { buffer, delivery }
    }

    /// Handle one render quantum.
    ///
    /// `input` is the engine's render result for this quantum: the captured
    /// mono frames, or the engine-reported failure. `output` is whatever
    /// playback channels the engine expects filled.
    ///
    /// On failure the error is logged and returned as the callback's status;
    /// accumulation and delivery are skipped for that invocation and nothing
    /// is retried — a retry inside the callback risks missing the deadline.
    pub fn on_render(
        &self,
        input: Result<&[f32], MonitorError>,
        output: &mut [&mut [f32]],
    ) -> Result<(), MonitorError> {
        let frames = match input {
            Ok(frames) => frames,
            Err(err) => {
                log::error!("engine render failed: {err}");
                return Err(err);
            }
        };

        // Bounded lock: one copy_from_slice of at most a window's frames.
        self.buffer.lock().write(frames);

        // Pure listener: never pass live microphone audio back out, which
        // would feed back into the capture.
        for channel in output.iter_mut() {
            channel.fill(0.0);
        }

        // Schedule, don't perform: the estimators run on the delivery
        // thread. A full channel means a delivery is already pending and the
        // token is simply dropped.
        let _ = self.delivery.try_send(());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;

    fn handler_with_capacity(capacity: usize) -> (RenderHandler, crossbeam_channel::Receiver<()>) {
        let (tx, rx) = bounded(1);
        let buffer = Arc::new(Mutex::new(AccumulationBuffer::new(capacity)));
        (RenderHandler::new(buffer, tx), rx)
    }

    #[test]
    fn accumulates_frames_and_schedules_delivery() {
        let (handler, rx) = handler_with_capacity(8);
        handler.on_render(Ok(&[0.1, 0.2]), &mut []).unwrap();

        assert_eq!(&handler.buffer.lock().samples()[..2], &[0.1, 0.2]);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn zeroes_every_output_channel() {
        let (handler, _rx) = handler_with_capacity(8);
        let mut left = [0.5f32; 4];
        let mut right = [-0.5f32; 4];
        handler
            .on_render(Ok(&[0.1; 4]), &mut [&mut left, &mut right])
            .unwrap();

        assert_eq!(left, [0.0; 4]);
        assert_eq!(right, [0.0; 4]);
    }

    #[test]
    fn engine_failure_skips_accumulation_and_delivery() {
        let (handler, rx) = handler_with_capacity(8);
        let err = MonitorError::RenderFailed("status -10863".into());

        let result = handler.on_render(Err(err.clone()), &mut []);

        assert_eq!(result, Err(err));
        assert_eq!(handler.buffer.lock().samples(), &[0.0; 8]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn delivery_requests_coalesce_when_one_is_pending() {
        let (handler, rx) = handler_with_capacity(8);
        handler.on_render(Ok(&[0.1]), &mut []).unwrap();
        handler.on_render(Ok(&[0.2]), &mut []).unwrap();
        handler.on_render(Ok(&[0.3]), &mut []).unwrap();

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
