use std::time::Duration;

use crate::models::state::{LifecycleEvent, LifecycleState, PowerState};

/// Capture-affecting side effect requested by a lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Stop capture to save battery; remember it was running.
    Suspend,
    /// Restart capture suspended earlier.
    Resume,
}

/// Conditions sampled at the moment an event is applied.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleContext {
    pub is_running: bool,
    pub power: PowerState,
}

/// Background power-saving state machine.
///
/// Capture left running while the app is backgrounded and the device is
/// unplugged silently drains battery; after a configurable delay in that
/// condition, capture is suspended and restored on the next foreground
/// transition. Bounded and reversible, not a shutdown.
///
/// The whole machine is a single transition function over explicit states
/// and events with `now` passed in, so it tests without real timers.
#[derive(Debug)]
pub struct LifecycleController {
    state: LifecycleState,
    was_running_before_suspend: bool,
    disable_delay: Duration,
}

impl LifecycleController {
    pub fn new(disable_delay: Duration) -> Self {
        Self {
            state: LifecycleState::Foreground,
            was_running_before_suspend: false,
            disable_delay,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn disable_delay(&self) -> Duration {
        self.disable_delay
    }

    /// Takes effect at the next arming; an already-armed deadline stands.
    pub fn set_disable_delay(&mut self, delay: Duration) {
        self.disable_delay = delay;
    }

    /// Apply one event, returning the side effect the caller must perform.
    pub fn on_event(
        &mut self,
        event: LifecycleEvent,
        ctx: LifecycleContext,
    ) -> Option<LifecycleAction> {
        match (self.state, event) {
            (
                LifecycleState::Foreground | LifecycleState::BackgroundArmed { .. },
                LifecycleEvent::EnteredBackground { now },
            ) => {
                self.state = LifecycleState::BackgroundArmed {
                    deadline: now + self.disable_delay,
                };
                None
            }
            (LifecycleState::BackgroundArmed { .. }, LifecycleEvent::TimerFired { now }) => {
                if ctx.is_running && ctx.power == PowerState::Unplugged {
                    self.state = LifecycleState::BackgroundDisabled;
                    self.was_running_before_suspend = true;
                    Some(LifecycleAction::Suspend)
                } else {
                    // Conditions not met; the timer recurs.
                    self.state = LifecycleState::BackgroundArmed {
                        deadline: now + self.disable_delay,
                    };
                    None
                }
            }
            (LifecycleState::BackgroundArmed { .. }, LifecycleEvent::EnteringForeground) => {
                // No suspension happened; dropping the deadline cancels the
                // timer without touching capture.
                self.state = LifecycleState::Foreground;
                None
            }
            (LifecycleState::BackgroundDisabled, LifecycleEvent::EnteringForeground) => {
                self.state = LifecycleState::Foreground;
                if self.was_running_before_suspend {
                    self.was_running_before_suspend = false;
                    Some(LifecycleAction::Resume)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    const DELAY: Duration = Duration::from_secs(600);

    fn ctx(is_running: bool, power: PowerState) -> LifecycleContext {
        LifecycleContext { is_running, power }
    }

    #[test]
    fn backgrounding_arms_the_timer() {
        let mut machine = LifecycleController::new(DELAY);
        let now = Instant::now();

        let action = machine.on_event(
            LifecycleEvent::EnteredBackground { now },
            ctx(true, PowerState::Unplugged),
        );

        assert_eq!(action, None);
        assert_eq!(machine.state().armed_deadline(), Some(now + DELAY));
    }

    #[test]
    fn tick_while_running_and_unplugged_suspends() {
        let mut machine = LifecycleController::new(DELAY);
        let now = Instant::now();
        machine.on_event(
            LifecycleEvent::EnteredBackground { now },
            ctx(true, PowerState::Unplugged),
        );

        let action = machine.on_event(
            LifecycleEvent::TimerFired { now: now + DELAY },
            ctx(true, PowerState::Unplugged),
        );

        assert_eq!(action, Some(LifecycleAction::Suspend));
        assert!(machine.state().is_disabled());
    }

    #[test]
    fn tick_on_external_power_rearms_instead() {
        let mut machine = LifecycleController::new(DELAY);
        let now = Instant::now();
        machine.on_event(
            LifecycleEvent::EnteredBackground { now },
            ctx(true, PowerState::External),
        );

        let fired = now + DELAY;
        let action = machine.on_event(
            LifecycleEvent::TimerFired { now: fired },
            ctx(true, PowerState::External),
        );

        assert_eq!(action, None);
        assert_eq!(machine.state().armed_deadline(), Some(fired + DELAY));
    }

    #[test]
    fn tick_while_stopped_rearms_instead() {
        let mut machine = LifecycleController::new(DELAY);
        let now = Instant::now();
        machine.on_event(
            LifecycleEvent::EnteredBackground { now },
            ctx(false, PowerState::Unplugged),
        );

        let action = machine.on_event(
            LifecycleEvent::TimerFired { now: now + DELAY },
            ctx(false, PowerState::Unplugged),
        );

        assert_eq!(action, None);
        assert!(machine.state().is_armed());
    }

    #[test]
    fn foregrounding_before_the_deadline_just_cancels() {
        let mut machine = LifecycleController::new(DELAY);
        let now = Instant::now();
        machine.on_event(
            LifecycleEvent::EnteredBackground { now },
            ctx(true, PowerState::Unplugged),
        );

        let action = machine.on_event(
            LifecycleEvent::EnteringForeground,
            ctx(true, PowerState::Unplugged),
        );

        assert_eq!(action, None);
        assert!(machine.state().is_foreground());

        // The stale deadline must not fire after cancellation.
        let late = machine.on_event(
            LifecycleEvent::TimerFired { now: now + DELAY },
            ctx(true, PowerState::Unplugged),
        );
        assert_eq!(late, None);
    }

    #[test]
    fn foregrounding_after_suspension_resumes_once() {
        let mut machine = LifecycleController::new(DELAY);
        let now = Instant::now();
        machine.on_event(
            LifecycleEvent::EnteredBackground { now },
            ctx(true, PowerState::Unplugged),
        );
        machine.on_event(
            LifecycleEvent::TimerFired { now: now + DELAY },
            ctx(true, PowerState::Unplugged),
        );

        let action = machine.on_event(
            LifecycleEvent::EnteringForeground,
            ctx(false, PowerState::Unplugged),
        );
        assert_eq!(action, Some(LifecycleAction::Resume));
        assert!(machine.state().is_foreground());

        // The sticky flag is consumed; a second round trip without a
        // suspension must not resume again.
        machine.on_event(
            LifecycleEvent::EnteredBackground { now },
            ctx(false, PowerState::Unplugged),
        );
        let second = machine.on_event(
            LifecycleEvent::EnteringForeground,
            ctx(false, PowerState::Unplugged),
        );
        assert_eq!(second, None);
    }

    #[test]
    fn repeated_background_notifications_rearm_from_the_latest() {
        let mut machine = LifecycleController::new(DELAY);
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(30);
        machine.on_event(
            LifecycleEvent::EnteredBackground { now: t0 },
            ctx(true, PowerState::Unplugged),
        );
        machine.on_event(
            LifecycleEvent::EnteredBackground { now: t1 },
            ctx(true, PowerState::Unplugged),
        );

        assert_eq!(machine.state().armed_deadline(), Some(t1 + DELAY));
    }

    #[test]
    fn machine_cycles_for_the_process_lifetime() {
        // No terminal state: suspend/resume twice in a row.
        let mut machine = LifecycleController::new(DELAY);
        for round in 0..2 {
            let now = Instant::now();
            machine.on_event(
                LifecycleEvent::EnteredBackground { now },
                ctx(true, PowerState::Unplugged),
            );
            let suspend = machine.on_event(
                LifecycleEvent::TimerFired { now: now + DELAY },
                ctx(true, PowerState::Unplugged),
            );
            assert_eq!(suspend, Some(LifecycleAction::Suspend), "round {round}");
            let resume = machine.on_event(
                LifecycleEvent::EnteringForeground,
                ctx(false, PowerState::Unplugged),
            );
            assert_eq!(resume, Some(LifecycleAction::Resume), "round {round}");
        }
    }
}
