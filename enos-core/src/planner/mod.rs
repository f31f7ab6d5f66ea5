//! Offline Schedule Computation
//!
//! ## Overview
//!
//! Once per cycle, the planner turns a harvest prediction into the slot
//! table the online allocator lives off for the next cycle. The work is
//! split into three passes over the slot table:
//!
//! ```text
//! prediction ──► partition ──► error correction ──► offset correction
//!                (build slots)  (cancel bound        (converge on the
//!                               violations)          target end level)
//! ```
//!
//! 1. **Partition** classifies every tick by comparing predicted harvest
//!    against the consumption bounds and merges runs of equal
//!    classification into battery slots, projecting the battery level as
//!    it goes.
//! 2. **Error correction** walks the slots looking for projected
//!    excursions past `BATT_MIN`/`BATT_MAX` and moves consumption
//!    between slots to cancel them. This is the only pass that can fail:
//!    a violation that no amount of redistribution can absorb makes the
//!    cycle's schedule unusable.
//! 3. **Offset correction** (optional per request) removes any residual
//!    gap between the achieved and the desired end-of-cycle level by
//!    adjusting consumption backward from the last slot. Whatever gap
//!    survives is reported, not raised: it is accepted drift from
//!    energy-neutral operation.
//!
//! A fourth operation, [`raise_floor`], is not part of the per-cycle
//! pipeline: it lifts the consumption floor of an already-computed
//! schedule for deployments that need a higher duty cycle mid-cycle.
//!
//! ## Cost
//!
//! Everything is integer arithmetic over at most
//! [`MAX_BATTERY_SLOTS`](crate::constants::MAX_BATTERY_SLOTS) slots;
//! the worst case is O(slots × widest adjustment window), comfortably
//! inside one tick period on MCU-class hardware.

// Macro for optional logging
#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {{}};
}

mod correction;
mod floor;
mod offset;
mod partition;

pub use floor::raise_floor;

use crate::constants::TICKS_PER_CYCLE;
use crate::errors::PlanResult;
use crate::schedule::Schedule;
use crate::slot::Energy;

/// Inputs of one planning run
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest {
    /// Battery level at the first tick of the cycle (watt-ticks)
    pub start_level: Energy,
    /// Battery level the cycle should end at (watt-ticks)
    pub target_level: Energy,
    /// Per-tick consumption floor, at least `E_CONS_MIN` (watt-ticks)
    pub floor: Energy,
    /// Whether to run the offset-correction pass after error correction
    pub correct_offset: bool,
}

/// Telemetry from a successful planning run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanReport {
    /// Battery slots in the computed schedule
    pub slots: usize,
    /// Net consumption change left over from error correction; applies
    /// to every slot after the last adjustment window (watt-ticks)
    pub battery_delta: i64,
    /// Gap to the target end level that offset correction could not
    /// absorb; `None` when the pass was not requested (watt-ticks)
    pub residual_offset: Option<i64>,
    /// A slot's projected level swing exceeded `BATT_CAPACITY`: the
    /// prediction is physically impossible to ride out unclipped.
    /// Advisory; error correction decides whether the cycle survives.
    pub capacity_flagged: bool,
}

/// Computes the cycle schedule from a harvest prediction.
///
/// Rebuilds `schedule` from scratch: partitions the prediction into
/// battery slots, cancels projected bound violations, and (when
/// requested) converges the end-of-cycle level onto
/// `request.target_level`.
///
/// On error the schedule contents are unspecified and must not be
/// consumed; the caller is expected to fall back to the consumption
/// floor for the remainder of the cycle.
pub fn plan(
    schedule: &mut Schedule,
    request: &PlanRequest,
    prediction: &[Energy; TICKS_PER_CYCLE],
) -> PlanResult<PlanReport> {
    debug_assert!(request.floor >= crate::constants::E_CONS_MIN);
    debug_assert!(request.floor <= crate::constants::E_CONS_MAX);

    let partitioned = partition::partition(schedule, request.start_level, request.floor, prediction)?;
    if partitioned.capacity_flagged {
        log_warn!(
            "prediction swings past battery capacity; deferring to error correction"
        );
    }

    let battery_delta = correction::sweep(schedule, request.floor)?;

    let residual_offset = if request.correct_offset {
        let residual =
            offset::correct_offset(schedule, request.target_level, request.floor, battery_delta);
        log_debug!("offset correction left {} watt-ticks of drift", residual);
        Some(residual)
    } else {
        None
    };

    Ok(PlanReport {
        slots: schedule.slot_count(),
        battery_delta,
        residual_offset,
        capacity_flagged: partitioned.capacity_flagged,
    })
}
