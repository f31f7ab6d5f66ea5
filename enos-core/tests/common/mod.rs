//! Shared fixtures for the integration suites: prediction-array
//! builders, collaborator doubles, and schedule invariant checks.

#![allow(dead_code)]

use enos_core::constants::{BATT_MAX, BATT_MIN, TICKS_PER_CYCLE};
use enos_core::{BatteryProbe, Energy, HarvestPredictor, Schedule};

/// Flat prediction at one harvest value
pub fn flat(value: Energy) -> [Energy; TICKS_PER_CYCLE] {
    [value; TICKS_PER_CYCLE]
}

/// First half of the cycle at `first`, second half at `second`
pub fn two_phase(first: Energy, second: Energy) -> [Energy; TICKS_PER_CYCLE] {
    let mut prediction = [first; TICKS_PER_CYCLE];
    for value in prediction.iter_mut().skip(TICKS_PER_CYCLE / 2) {
        *value = second;
    }
    prediction
}

/// Three contiguous phases of roughly a third of the cycle each
pub fn three_phase(
    first: Energy,
    second: Energy,
    third: Energy,
) -> [Energy; TICKS_PER_CYCLE] {
    let mut prediction = [first; TICKS_PER_CYCLE];
    let third_len = TICKS_PER_CYCLE / 3;
    for value in prediction.iter_mut().skip(third_len).take(third_len) {
        *value = second;
    }
    for value in prediction.iter_mut().skip(2 * third_len) {
        *value = third;
    }
    prediction
}

/// A plausible clear-sky day: dark nights, gentle shoulders, a strong
/// midday plateau
pub fn solar_day() -> [Energy; TICKS_PER_CYCLE] {
    let mut prediction = [0u32; TICKS_PER_CYCLE];
    for (tick, value) in prediction.iter_mut().enumerate() {
        *value = match tick {
            0..=35 => 0,            // night
            36..=59 => 40_000,      // morning shoulder
            60..=83 => 200_000,     // midday, above the consumption cap
            84..=107 => 40_000,     // afternoon shoulder
            _ => 0,                 // night again
        };
    }
    prediction
}

/// Battery probe double reporting a fixed level
pub struct FixedBattery(pub Energy);

impl BatteryProbe for FixedBattery {
    fn level(&self) -> Energy {
        self.0
    }
}

/// Predictor double serving a canned cycle prediction
pub struct ArrayPredictor(pub [Energy; TICKS_PER_CYCLE]);

impl HarvestPredictor for ArrayPredictor {
    fn cycle_prediction(&self) -> &[Energy; TICKS_PER_CYCLE] {
        &self.0
    }
}

/// Checks the structural invariants every accepted schedule must hold:
/// levels inside the battery window, slot lengths covering the cycle
/// exactly, slots contiguous and non-overlapping.
pub fn assert_schedule_invariants(schedule: &Schedule) {
    let mut next_tick: u16 = 0;
    let mut total_ticks: usize = 0;

    for (idx, slot) in schedule.iter().enumerate() {
        assert!(slot.length > 0, "slot {idx} has zero length");
        assert_eq!(
            slot.start_tick, next_tick,
            "slot {idx} does not start where its predecessor ended"
        );
        assert!(
            slot.min_level <= slot.max_level,
            "slot {idx} has inverted levels"
        );
        assert!(
            slot.min_level >= i64::from(BATT_MIN),
            "slot {idx} dips under BATT_MIN: {}",
            slot.min_level
        );
        assert!(
            slot.max_level <= i64::from(BATT_MAX),
            "slot {idx} exceeds BATT_MAX: {}",
            slot.max_level
        );

        next_tick += slot.length;
        total_ticks += slot.length as usize;
    }

    assert_eq!(total_ticks, TICKS_PER_CYCLE, "slot lengths must cover the cycle");
}
