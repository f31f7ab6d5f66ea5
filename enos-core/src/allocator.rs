//! Online Allowance Allocation
//!
//! ## Overview
//!
//! The offline schedule fixes how much each battery slot may consume in
//! total; the online allocator turns that into a per-tick allowance and
//! keeps it honest against reality. Every tick it compares the battery
//! level the schedule *expected* by now with the level the hardware
//! actually reports, and spreads the corrected remaining budget evenly
//! over the slot's remaining ticks:
//!
//! ```text
//! expected = slot entry level + predicted harvest so far
//!            - mean consumption × ticks elapsed
//! budget   = mean consumption × ticks left + (actual - expected)
//! allowance = max(budget / ticks left, floor)
//! ```
//!
//! Harvest that came in above prediction, or consumption that ran under
//! the plan, shows up as `actual > expected` and widens the allowance;
//! the reverse narrows it, down to the consumption floor.
//!
//! ## Output
//!
//! The allowance is published in two forms: the exact watt-tick value,
//! and an 8-bit normalization (linear between `E_CONS_MIN` and
//! `E_CONS_MAX`) for the transport-layer rate controller, which maps it
//! onto a packet-sending period. "No allowance computed yet" is an
//! explicit `None`, never a sentinel bit pattern.

use crate::constants::{E_CONS_MAX, E_CONS_MIN};
use crate::schedule::Schedule;
use crate::slot::Energy;

/// Instantaneous consumption limit in both published forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allowance {
    /// Allowed consumption for this tick (watt-ticks)
    pub energy: Energy,
    /// The same limit scaled linearly onto `0..=255` between
    /// `E_CONS_MIN` and `E_CONS_MAX`
    pub scaled: u8,
}

impl Allowance {
    /// Builds the pair from an exact allowance
    pub(crate) fn from_energy(energy: Energy) -> Self {
        Self {
            energy,
            scaled: scale_to_8bit(energy),
        }
    }
}

/// Linear 8-bit normalization of an allowance, clamped to the
/// consumption bounds
pub fn scale_to_8bit(allowance: Energy) -> u8 {
    let clamped = allowance.clamp(E_CONS_MIN, E_CONS_MAX);
    let span = u64::from(E_CONS_MAX - E_CONS_MIN);
    (u64::from(clamped - E_CONS_MIN) * 255 / span) as u8
}

/// Per-tick allowance estimator over the current battery slot
///
/// Holds only cursor state: which slot the cycle is in, how many of its
/// ticks remain, and how much harvest the prediction promised since the
/// slot began. Everything else is recomputed each tick from the schedule
/// and the measured battery level.
#[derive(Debug, Clone)]
pub struct OnlineAllocator {
    /// 1-based slot cursor; 0 until the first slot of a cycle begins
    slot: usize,
    /// Ticks left in the current slot, counting this one
    remaining_ticks: u16,
    /// Predicted harvest accumulated since the slot began (watt-ticks)
    predicted_in_slot: Energy,
    /// Last published allowance; `None` until the first tick
    allowance: Option<Allowance>,
}

impl OnlineAllocator {
    /// Creates an allocator with no cycle in progress
    pub const fn new() -> Self {
        Self {
            slot: 0,
            remaining_ticks: 0,
            predicted_in_slot: 0,
            allowance: None,
        }
    }

    /// Resets the slot cursor for a freshly recomputed cycle
    pub fn begin_cycle(&mut self) {
        self.slot = 0;
        self.remaining_ticks = 0;
        self.predicted_in_slot = 0;
    }

    /// Last published allowance, if any tick has run yet
    pub fn allowance(&self) -> Option<Allowance> {
        self.allowance
    }

    /// Runs one tick: advances the slot cursor if the previous slot is
    /// exhausted, re-estimates the remaining budget from the measured
    /// battery level, and publishes the resulting allowance.
    ///
    /// `predicted` is this tick's entry of the harvest prediction; it
    /// feeds the drift estimate for the rest of the slot.
    pub fn on_tick(
        &mut self,
        schedule: &Schedule,
        battery: Energy,
        predicted: Energy,
        floor: Energy,
    ) -> Allowance {
        if self.remaining_ticks == 0 {
            // A new battery slot begins
            self.slot += 1;
            self.predicted_in_slot = 0;
            self.remaining_ticks = schedule.slot_length(self.slot);
        }

        let length = schedule.slot_length(self.slot);
        let allowance = if length == 0 {
            // Ran past the schedule (empty table or drifted cursor):
            // hold the conservative floor until the next recompute
            Allowance::from_energy(floor)
        } else {
            let per_tick = i64::from(schedule.slot_total_consumption(self.slot) / u32::from(length));
            let elapsed = i64::from(length - self.remaining_ticks);
            let remaining = i64::from(self.remaining_ticks);

            let expected = i64::from(schedule.slot_entry_level(self.slot))
                + i64::from(self.predicted_in_slot)
                - per_tick * elapsed;
            // Budget for the rest of the slot, corrected by how far
            // reality is from the projection; transiently negative when
            // the battery runs well behind plan
            let budget = per_tick * remaining + i64::from(battery) - expected;

            if budget < remaining * i64::from(floor) {
                Allowance::from_energy(floor)
            } else {
                Allowance::from_energy((budget / remaining) as Energy)
            }
        };

        self.allowance = Some(allowance);
        self.predicted_in_slot = self.predicted_in_slot.saturating_add(predicted);
        if self.remaining_ticks > 0 {
            self.remaining_ticks -= 1;
        }

        allowance
    }
}

impl Default for OnlineAllocator {
    fn default() -> Self {
        Self::new()
    }
}
