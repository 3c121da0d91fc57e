use std::time::{Duration, Instant};

use crate::models::tone::Tone;

/// Timed simulated-tone injection.
///
/// While active, the injected tone preempts the estimators on the sample
/// path — useful for deterministic testing or assistive simulation without
/// real audio input. The override holds for a fixed window from the last
/// injection; re-injection replaces the tone and restarts the window
/// (debounced renewal, not additive).
#[derive(Debug)]
pub struct ToneOverride {
    slot: Option<(Tone, Instant)>,
    hold: Duration,
}

impl ToneOverride {
    pub fn new(hold: Duration) -> Self {
        Self { slot: None, hold }
    }

    /// Store `tone` and restart the expiry window from `now`.
    pub fn inject(&mut self, tone: Tone, now: Instant) {
        self.slot = Some((tone, now + self.hold));
    }

    /// The injected tone, while the expiry window has not yet elapsed.
    /// Expired overrides are cleared on query.
    pub fn current(&mut self, now: Instant) -> Option<Tone> {
        match self.slot {
            Some((tone, deadline)) if now < deadline => Some(tone),
            Some(_) => {
                self.slot = None;
                None
            }
            None => None,
        }
    }

    /// Drop any pending override. A no-op when none is active.
    pub fn clear(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLD: Duration = Duration::from_secs(1);

    #[test]
    fn injected_tone_wins_until_the_deadline() {
        let mut over = ToneOverride::new(HOLD);
        let t0 = Instant::now();
        let tone = Tone::new(440.0, 0.5);

        over.inject(tone, t0);
        assert_eq!(over.current(t0), Some(tone));
        assert_eq!(over.current(t0 + Duration::from_millis(999)), Some(tone));
        assert_eq!(over.current(t0 + HOLD), None);
    }

    #[test]
    fn expiry_clears_the_slot() {
        let mut over = ToneOverride::new(HOLD);
        let t0 = Instant::now();

        over.inject(Tone::new(100.0, 0.1), t0);
        assert_eq!(over.current(t0 + HOLD), None);
        // A later query before the old deadline would have hit must stay None.
        assert_eq!(over.current(t0), None);
    }

    #[test]
    fn reinjection_restarts_the_window() {
        let mut over = ToneOverride::new(HOLD);
        let t0 = Instant::now();
        let first = Tone::new(100.0, 0.1);
        let second = Tone::new(200.0, 0.2);

        over.inject(first, t0);
        over.inject(second, t0 + Duration::from_millis(900));

        // Past the first deadline but inside the renewed one.
        let probe = t0 + Duration::from_millis(1500);
        assert_eq!(over.current(probe), Some(second));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut over = ToneOverride::new(HOLD);
        over.clear();
        over.inject(Tone::new(1.0, 1.0), Instant::now());
        over.clear();
        over.clear();
        assert_eq!(over.current(Instant::now()), None);
    }
}
