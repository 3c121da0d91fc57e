//! Autocorrelation pitch estimator.
//!
//! Assumes the true period equals the first local maximum after the zero-lag
//! peak. That holds for strongly periodic (voiced) signals and is unreliable
//! for complex timbres; the confidence threshold and plausibility ceiling
//! exist to suppress the resulting false positives.

/// Minimum normalized autocorrelation magnitude before a detected lag is
/// trusted as a true pitch period.
pub const CONFIDENCE_THRESHOLD: f32 = 0.3;

/// Plausibility ceiling; anything above this is a spurious short-lag peak.
pub const PITCH_CEILING_HZ: f64 = 5000.0;

/// Estimate the fundamental frequency of `samples` in Hz.
///
/// Pure function of its snapshot input. Returns a finite value in
/// `(0, 5000]`, or 0.0 when no confident pitch is present (silence,
/// unvoiced or noisy input, or a buffer too short to correlate).
pub fn estimate(samples: &[f32], window_len: usize, sample_rate: f64, depth: usize) -> f64 {
    // Truncate to a 4-aligned window, the same alignment the volume path
    // uses.
    let effective_len = window_len.min(samples.len());
    let effective_len = effective_len - effective_len % 4;
    let half = effective_len / 2;

    if half == 0 || depth < 3 || sample_rate <= 0.0 {
        return 0.0;
    }
    // Every lag needs a full half-window of overlap.
    if samples.len() < depth - 1 + half {
        return 0.0;
    }

    // The correlation scratch lives for the whole call; the peak magnitude
    // below is read while it is still valid.
    let mut correlation = vec![0.0f32; depth];
    let window = &samples[..half];
    for (lag, value) in correlation.iter_mut().enumerate() {
        let shifted = &samples[lag..lag + half];
        *value = shifted.iter().zip(window).map(|(a, b)| a * b).sum();
    }

    // Normalize against the zero-lag energy so voiced peaks land in roughly
    // [-1, 1] and the confidence gate is amplitude-independent.
    let energy = correlation[0];
    if energy <= f32::EPSILON {
        return 0.0;
    }
    for value in correlation.iter_mut() {
        *value /= energy;
    }

    // First local maximum after the zero-lag peak. Lag 0 is the trivial
    // full-correlation peak and carries no pitch information.
    let mut first_peak = 0;
    for i in 1..depth - 1 {
        if correlation[i] > correlation[i - 1] && correlation[i] > correlation[i + 1] {
            first_peak = i;
            break;
        }
    }
    if first_peak == 0 {
        return 0.0;
    }

    if correlation[first_peak] <= CONFIDENCE_THRESHOLD {
        return 0.0;
    }

    let hz = sample_rate / first_peak as f64;
    if hz > PITCH_CEILING_HZ {
        return 0.0;
    }
    hz
}
