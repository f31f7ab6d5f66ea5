//! Collaborator Interfaces
//!
//! The scheduler core is sandwiched between three external modules it
//! does not implement: the battery accounting hardware below it, the
//! harvest predictor beside it, and the rate controller above it. The
//! first two are queried, so they appear here as traits; the third only
//! consumes the published allowance and needs no trait.
//!
//! Implementations are expected to be cheap: both traits are called on
//! every tick from the sample handler.

use crate::constants::TICKS_PER_CYCLE;
use crate::slot::Energy;

/// Ground-truth battery level, as accounted by the energy-measurement
/// hardware.
///
/// Implementors must report a level already clamped to `[0, BATT_MAX]`;
/// the online allocator treats the value as exact when it corrects the
/// schedule's projection against reality.
pub trait BatteryProbe {
    /// Current battery level in watt-ticks
    fn level(&self) -> Energy;
}

/// Per-slot harvest prediction for the running cycle.
///
/// The predictor (an exponentially-weighted filter over past cycles in
/// the reference deployment) maintains one predicted harvest value per
/// tick. The whole array is consumed once per cycle when the schedule is
/// recomputed; single entries are consumed every tick to track
/// prediction drift inside the current battery slot.
pub trait HarvestPredictor {
    /// Predicted harvest for every tick of the cycle, in watt-ticks.
    ///
    /// Entries must already be capped at
    /// [`HARVEST_CAP`](crate::constants::HARVEST_CAP).
    fn cycle_prediction(&self) -> &[Energy; TICKS_PER_CYCLE];

    /// Predicted harvest for one tick; `0` for an out-of-cycle index
    fn predicted(&self, tick: u16) -> Energy {
        self.cycle_prediction()
            .get(usize::from(tick))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flat([Energy; TICKS_PER_CYCLE]);

    impl HarvestPredictor for Flat {
        fn cycle_prediction(&self) -> &[Energy; TICKS_PER_CYCLE] {
            &self.0
        }
    }

    #[test]
    fn default_tick_lookup() {
        let predictor = Flat([42; TICKS_PER_CYCLE]);
        assert_eq!(predictor.predicted(0), 42);
        assert_eq!(predictor.predicted((TICKS_PER_CYCLE - 1) as u16), 42);
        // Out of cycle reads as no harvest
        assert_eq!(predictor.predicted(TICKS_PER_CYCLE as u16), 0);
    }
}
