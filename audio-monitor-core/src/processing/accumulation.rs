/// Fixed-capacity sample store fed by the capture callback.
///
/// Wrap in `Arc<parking_lot::Mutex<AccumulationBuffer>>` for cross-thread
/// access; the capture thread holds the lock only for one bounded copy.
///
/// This is NOT a wrap-around ring buffer: when a write would run past
/// capacity the cursor resets to 0 and the new frames overwrite from the
/// start. The tail beyond the last reset point keeps stale samples until the
/// next cycle catches up, so a reader can see a mix of fresh head data and
/// stale tail data. Known limitation, kept deliberately: the analysis window
/// (16384 samples ≈ 370 ms) dwarfs one callback's frame count (≤ 4096
/// samples), so staleness is bounded and self-correcting within a few
/// callbacks, and no wrap-around copy ever happens on the capture thread.
#[derive(Debug)]
pub struct AccumulationBuffer {
    samples: Vec<f32>,
    cursor: usize,
}

impl AccumulationBuffer {
    /// Allocates the buffer once; it is never resized afterwards.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: vec![0.0; capacity],
            cursor: 0,
        }
    }

    /// Place one callback's frames at the cursor, overwriting from zero when
    /// the write would run past capacity.
    ///
    /// Frames beyond capacity are dropped (a single callback never delivers
    /// more than the analysis window in practice). The cursor stays in
    /// `[0, capacity)`.
    pub fn write(&mut self, frames: &[f32]) {
        if frames.is_empty() || self.samples.is_empty() {
            return;
        }

        let frames = &frames[..frames.len().min(self.samples.len())];

        if self.cursor + frames.len() >= self.samples.len() {
            self.cursor = 0;
        }

        let end = self.cursor + frames.len();
        self.samples[self.cursor..end].copy_from_slice(frames);
        self.cursor = end % self.samples.len();
    }

    /// The whole sample window, fresh head and stale tail alike, for the
    /// estimators to scan.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Current write position in samples.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }
}
