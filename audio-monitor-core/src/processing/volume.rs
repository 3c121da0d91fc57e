//! Peak-magnitude volume estimator.

/// Maximum sample value over the 4-aligned analysis window.
///
/// This is a signed maximum, not a peak absolute value: a window holding
/// only negative excursions reports a value at or below zero even for loud
/// input. Kept as-is for behavioral fidelity with the measurement this
/// replaces; see DESIGN.md before changing it.
pub fn estimate(samples: &[f32], window_len: usize) -> f64 {
    let effective_len = window_len.min(samples.len());
    let effective_len = effective_len - effective_len % 4;
    if effective_len == 0 {
        return 0.0;
    }

    samples[..effective_len]
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max) as f64
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn constant_buffer_reports_its_value() {
        let samples = vec![0.25f32; 64];
        assert_relative_eq!(estimate(&samples, 64), 0.25, epsilon = 1e-9);
    }

    #[test]
    fn negative_buffer_reports_at_most_zero() {
        // Signed maximum: loud but all-negative input still reads as quiet.
        let samples = vec![-0.9f32; 64];
        assert!(estimate(&samples, 64) <= 0.0);
        assert_relative_eq!(estimate(&samples, 64), -0.9, epsilon = 1e-6);
    }

    #[test]
    fn mixed_buffer_reports_the_largest_sample() {
        let samples = [0.1f32, -0.8, 0.6, 0.2];
        assert_relative_eq!(estimate(&samples, 4), 0.6, epsilon = 1e-6);
    }

    #[test]
    fn window_is_truncated_to_a_multiple_of_four() {
        // The peak sits past the 4-aligned cutoff and must be ignored.
        let samples = [0.1f32, 0.1, 0.1, 0.1, 0.9, 0.9];
        assert_relative_eq!(estimate(&samples, 6), 0.1, epsilon = 1e-6);
    }

    #[test]
    fn empty_buffer_is_silent() {
        assert_eq!(estimate(&[], 16384), 0.0);
    }
}
