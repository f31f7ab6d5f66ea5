//! Fixed-Capacity Schedule Table
//!
//! ## Overview
//!
//! The schedule is the only state shared between the offline planner and
//! the online allocator: an ordered table of [`BatterySlot`]s whose
//! lengths sum to exactly one cycle. It is rebuilt from scratch at every
//! cycle boundary and read-only to every consumer in between.
//!
//! Storage is a `heapless::Vec` whose capacity is the compile-time worst
//! case (one battery slot per harvesting tick), so building a schedule
//! can never allocate and can never overflow for a valid prediction
//! array.
//!
//! ## Accessor Contract
//!
//! Slot accessors take a **1-based** slot number, matching how the
//! online layer counts slots ("the cycle's third battery slot"). Queries
//! with slot number `0` or past the last slot return sentinels rather
//! than failing:
//!
//! - numeric accessors return `0`
//! - [`slot_kind`](Schedule::slot_kind) returns `None`
//!
//! Callers must treat these as "no such slot", never as data; the
//! bounds-checked [`slot`](Schedule::slot) view is the primary API and
//! the sentinel accessors exist for consumers that keep plain numeric
//! state (the allocator's slot cursor).
//!
//! Levels leave this module clamped to `[0, BATT_MAX]`; only the
//! planner sees the exact signed projections.

use heapless::Vec;

use crate::constants::{BATT_MAX, MAX_BATTERY_SLOTS};
use crate::errors::{PlanError, PlanResult};
use crate::slot::{BatterySlot, Energy, SlotKind};

/// Ordered battery-slot table for one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    slots: Vec<BatterySlot, MAX_BATTERY_SLOTS>,
}

impl Schedule {
    /// Creates an empty schedule
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Number of battery slots in the current cycle
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Whether the schedule holds no slots (no plan has run yet, or the
    /// last plan failed)
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drops all slots; the planner calls this at every rebuild
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    /// Appends a slot, reporting table exhaustion explicitly
    pub(crate) fn push(&mut self, slot: BatterySlot) -> PlanResult<()> {
        self.slots.push(slot).map_err(|_| PlanError::TableFull {
            capacity: MAX_BATTERY_SLOTS,
        })
    }

    /// Mutable view for the correction passes
    pub(crate) fn slots_mut(&mut self) -> &mut [BatterySlot] {
        &mut self.slots
    }

    /// Bounds-checked access by 1-based slot number
    pub fn slot(&self, number: usize) -> Option<&BatterySlot> {
        if number == 0 {
            return None;
        }
        self.slots.get(number - 1)
    }

    /// Iterates slots in cycle order
    pub fn iter(&self) -> impl Iterator<Item = &BatterySlot> {
        self.slots.iter()
    }

    /// Length in ticks of the given slot; `0` when there is no such slot
    pub fn slot_length(&self, number: usize) -> u16 {
        self.slot(number).map_or(0, |s| s.length)
    }

    /// Kind of the given slot; `None` is the out-of-range tag
    pub fn slot_kind(&self, number: usize) -> Option<SlotKind> {
        self.slot(number).map(|s| s.kind)
    }

    /// Total energy consumed across the given slot; `0` when there is no
    /// such slot
    pub fn slot_total_consumption(&self, number: usize) -> Energy {
        self.slot(number).map_or(0, |s| s.total_consumption)
    }

    /// Battery level at entry of the given slot, clamped to
    /// `[0, BATT_MAX]`; `0` when there is no such slot
    pub fn slot_entry_level(&self, number: usize) -> Energy {
        self.slot(number).map_or(0, |s| clamp_level(s.entry_level()))
    }

    /// Battery level at exit of the given slot, clamped to
    /// `[0, BATT_MAX]`; `0` when there is no such slot
    pub fn slot_exit_level(&self, number: usize) -> Energy {
        self.slot(number).map_or(0, |s| clamp_level(s.exit_level()))
    }
}

/// Clamps an exact signed level to the range external consumers see
fn clamp_level(level: i64) -> Energy {
    level.clamp(0, i64::from(BATT_MAX)) as Energy
}
