use crate::models::state::PowerState;

/// Host-provided source of device power-plug state.
///
/// `begin_observing`/`end_observing` bracket the backgrounded period, for
/// sources that need to switch platform battery monitoring on and off.
pub trait PowerMonitor: Send + Sync {
    fn begin_observing(&self) {}

    fn end_observing(&self) {}

    fn power_state(&self) -> PowerState;
}

/// Fallback for hosts with no plug-state reporting.
///
/// Always reports external power, so background power saving never suspends
/// capture unless the host wires up a real source.
pub struct ExternalPowerAssumed;

impl PowerMonitor for ExternalPowerAssumed {
    fn power_state(&self) -> PowerState {
        PowerState::External
    }
}
