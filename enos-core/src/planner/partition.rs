//! Pass 1: Slot Partitioning
//!
//! Classifies each tick of the prediction and merges runs of equal
//! classification into battery slots, projecting the battery level with
//! a wide signed accumulator as it goes. Classification against the
//! consumption bounds:
//!
//! - `harvest >= E_CONS_MAX` → charging, consumption pinned at the
//!   ceiling, the surplus charges the battery
//! - `harvest <= floor` → discharging, consumption pinned at the floor,
//!   the deficit drains the battery
//! - otherwise → constant, consumption tracks harvest exactly
//!
//! A slot whose projected level swing exceeds `BATT_CAPACITY` marks the
//! prediction as physically impossible; the pass only flags this;
//! deciding whether the cycle is still schedulable is error
//! correction's job.

use crate::constants::{BATT_CAPACITY, E_CONS_MAX, TICKS_PER_CYCLE};
use crate::errors::PlanResult;
use crate::schedule::Schedule;
use crate::slot::{BatterySlot, Energy, SlotKind};

/// Outcome of the partitioning pass
#[derive(Debug, Clone, Copy)]
pub(super) struct PartitionReport {
    /// Some slot's level swing exceeds the battery's usable capacity
    pub capacity_flagged: bool,
}

/// Per-tick classification against the consumption bounds
fn classify(harvest: Energy, floor: Energy) -> (SlotKind, Energy) {
    if harvest >= E_CONS_MAX {
        (SlotKind::Charging, E_CONS_MAX)
    } else if harvest <= floor {
        (SlotKind::Discharging, floor)
    } else {
        (SlotKind::Constant, harvest)
    }
}

/// Builds the slot table from the prediction array.
pub(super) fn partition(
    schedule: &mut Schedule,
    start_level: Energy,
    floor: Energy,
    prediction: &[Energy; TICKS_PER_CYCLE],
) -> PlanResult<PartitionReport> {
    schedule.clear();

    let mut level = i64::from(start_level);
    let mut capacity_flagged = false;

    let (first_kind, _) = classify(prediction[0], floor);
    let mut current = BatterySlot {
        kind: first_kind,
        start_tick: 0,
        length: 0,
        min_level: level,
        max_level: level,
        total_consumption: 0,
    };

    for (tick, &harvest) in prediction.iter().enumerate() {
        let (kind, consumption) = classify(harvest, floor);

        if tick > 0 && kind != current.kind {
            current.length = tick as u16 - current.start_tick;
            capacity_flagged |= current.span() > i64::from(BATT_CAPACITY);
            schedule.push(current)?;

            current = BatterySlot {
                kind,
                start_tick: tick as u16,
                length: 0,
                min_level: level,
                max_level: level,
                total_consumption: 0,
            };
        }

        level += i64::from(harvest) - i64::from(consumption);
        if level < current.min_level {
            current.min_level = level;
        }
        if level > current.max_level {
            current.max_level = level;
        }
        current.total_consumption += consumption;
    }

    current.length = TICKS_PER_CYCLE as u16 - current.start_tick;
    capacity_flagged |= current.span() > i64::from(BATT_CAPACITY);
    schedule.push(current)?;

    log_debug!(
        "partitioned cycle into {} battery slots, end level {}",
        schedule.slot_count(),
        level
    );

    Ok(PartitionReport { capacity_flagged })
}
