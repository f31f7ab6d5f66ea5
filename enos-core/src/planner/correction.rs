//! Pass 2: Error Correction
//!
//! ## Overview
//!
//! Partitioning projects the battery level as if every slot ran its
//! natural consumption. Whenever that projection escapes
//! `[BATT_MIN, BATT_MAX]`, this pass moves consumption between slots to
//! pull it back:
//!
//! - **Waste** (overcharge): consume *more* ahead of the peak, in slots
//!   whose consumption is not already pinned at the ceiling:
//!   discharging and constant slots.
//! - **Overspent** (depletion): consume *less* ahead of the trough, in
//!   slots not already pinned at the floor: charging and constant
//!   slots.
//!
//! ## Adjustment Windows
//!
//! Corrections of opposite sign must not overlap: consuming more to
//! absorb a peak deepens every later trough, and vice versa. The sweep
//! therefore tracks, within the run of slots since the last adjustment,
//! the single worst violation and its sign. When a violation of the
//! *opposite* sign shows up, the tracked error is fixed over the window
//! ending at its worst slot, the window boundary moves past it, and the
//! sweep resumes from there. One final adjustment at the end of the
//! table absorbs whatever is still tracked, folding the accumulated
//! consumption delta into every remaining slot.
//!
//! Within a window, the amount recovered in a slot is bounded three
//! ways: by the error still outstanding, by the slot's own headroom, and
//! by the tightest level margin of any slot from here to the window end
//! (so a correction never manufactures a new violation downstream).
//! Recovery only counts in slots at or before the worst-error slot:
//! consumption moved *after* a peak cannot lower that peak.
//!
//! A window that ends with error left over makes the whole cycle
//! unschedulable; the caller falls back to the consumption floor.

use crate::constants::{BATT_MAX, BATT_MIN};
use crate::errors::{PlanError, PlanResult};
use crate::schedule::Schedule;
use crate::slot::{BatterySlot, Energy, ErrorKind, SlotKind};

/// Worst violation seen in the current adjustment window
#[derive(Debug, Clone, Copy)]
struct Tracked {
    /// Sign of the error being tracked
    kind: ErrorKind,
    /// Largest violation magnitude so far (watt-ticks)
    worst: i64,
    /// Index of the slot holding the worst violation
    worst_idx: usize,
    /// Level shift the pending correction would apply downstream:
    /// `-worst` for waste, `+worst` for overspend. Violations in later
    /// slots are evaluated as if the tracked error were already fixed.
    pending: i64,
}

impl Tracked {
    fn new(kind: ErrorKind, idx: usize) -> Self {
        Self {
            kind,
            worst: 0,
            worst_idx: idx,
            pending: 0,
        }
    }
}

/// Sweeps the slot table, fixing violations window by window.
///
/// Returns the net consumption change that still applies to slots after
/// the last adjustment window (zero whenever a final adjustment ran,
/// because that one folds the change through the end of the table).
pub(super) fn sweep(schedule: &mut Schedule, floor: Energy) -> PlanResult<i64> {
    let slots = schedule.slots_mut();

    let mut batt_delta: i64 = 0;
    let mut window_start = 0usize;
    let mut tracked: Option<Tracked> = None;

    let mut idx = 0usize;
    while idx < slots.len() {
        // Constant slots neither violate nor anchor a window; they are
        // only touched when an adjustment traverses them.
        if slots[idx].kind == SlotKind::Constant {
            idx += 1;
            continue;
        }

        let pending = tracked.as_ref().map_or(0, |t| t.pending);
        if let Some(kind) = slots[idx].violation_kind(batt_delta + pending) {
            match tracked {
                None => tracked = Some(Tracked::new(kind, idx)),
                Some(t) if t.kind != kind => {
                    // Opposite sign: changes cannot reach past this
                    // point, so fix the tracked error now.
                    log_debug!(
                        "{} of {} at slot {}, adjusting slots {}..={}",
                        t.kind.name(),
                        t.worst,
                        t.worst_idx,
                        window_start,
                        t.worst_idx
                    );
                    adjust_window(
                        slots,
                        window_start,
                        t.worst_idx + 1,
                        t.worst_idx,
                        floor,
                        t.worst,
                        t.kind,
                        &mut batt_delta,
                    )?;
                    window_start = t.worst_idx + 1;
                    idx = window_start;
                    tracked = None;
                    continue;
                }
                Some(_) => {}
            }
        }

        if let Some(t) = tracked.as_mut() {
            let magnitude = slots[idx].violation(batt_delta);
            if magnitude > t.worst {
                t.worst = magnitude;
                t.worst_idx = idx;
                t.pending = match t.kind {
                    ErrorKind::Waste => -magnitude,
                    ErrorKind::Overspent => magnitude,
                };
            }
        }

        idx += 1;
    }

    // Whatever is still tracked gets one final adjustment across the
    // whole tail, which also folds the accumulated delta into every
    // remaining slot - after that the delta is fully absorbed.
    if let Some(t) = tracked {
        if t.worst > 0 && window_start < slots.len() {
            log_debug!(
                "final adjustment for {} of {} over slots {}..{}",
                t.kind.name(),
                t.worst,
                window_start,
                slots.len()
            );
            adjust_window(
                slots,
                window_start,
                slots.len(),
                t.worst_idx,
                floor,
                t.worst,
                t.kind,
                &mut batt_delta,
            )?;
            batt_delta = 0;
        }
    }

    Ok(batt_delta)
}

/// Tightest distance to the violated threshold among `slots[from..end]`,
/// on the stored (pre-delta) levels.
///
/// For overspend recovery levels will rise, so the margin is room below
/// `BATT_MAX`; for waste recovery they will fall, so it is room above
/// `BATT_MIN`.
pub(super) fn tightest_margin(
    slots: &[BatterySlot],
    from: usize,
    end: usize,
    kind: ErrorKind,
) -> i64 {
    let mut margin = i64::MAX;
    for slot in &slots[from..end] {
        let m = match kind {
            ErrorKind::Overspent => i64::from(BATT_MAX) - slot.max_level,
            ErrorKind::Waste => slot.min_level - i64::from(BATT_MIN),
        };
        margin = margin.min(m);
    }
    margin
}

/// Redistributes consumption across `slots[start..end]` to cancel
/// `error` watt-ticks of the given kind.
///
/// Recovery is confined to `slots[start..=recover_through]`; slots past
/// that point only have the running `batt_delta` folded into their
/// levels. Returns [`PlanError::Unrecoverable`] when headroom runs out
/// before the error does.
#[allow(clippy::too_many_arguments)]
fn adjust_window(
    slots: &mut [BatterySlot],
    start: usize,
    end: usize,
    recover_through: usize,
    floor: Energy,
    mut error: i64,
    kind: ErrorKind,
    batt_delta: &mut i64,
) -> PlanResult<()> {
    for idx in start..end {
        let eligible = idx <= recover_through
            && match (kind, slots[idx].kind) {
                (_, SlotKind::Constant) => true,
                (ErrorKind::Overspent, SlotKind::Charging) => true,
                (ErrorKind::Waste, SlotKind::Discharging) => true,
                _ => false,
            };

        if !eligible {
            // No consumption change here, but the ongoing level shift
            // still applies.
            slots[idx].min_level += *batt_delta;
            slots[idx].max_level += *batt_delta;
            continue;
        }

        let recoverable = match kind {
            ErrorKind::Overspent => i64::from(slots[idx].max_decrease(floor)),
            ErrorKind::Waste => i64::from(slots[idx].max_increase()),
        };
        // Never push a slot between here and the window end past a
        // threshold; the stored margins predate the running delta.
        let margin = tightest_margin(slots, idx, end, kind);
        let headroom = match kind {
            ErrorKind::Overspent => margin - *batt_delta,
            ErrorKind::Waste => margin + *batt_delta,
        };

        let recovered = error.min(headroom.max(0)).min(recoverable);
        error -= recovered;

        // Signed consumption change: positive consumes more (drains),
        // negative consumes less (lets the level rise).
        let change = match kind {
            ErrorKind::Overspent => -recovered,
            ErrorKind::Waste => recovered,
        };

        let slot = &mut slots[idx];
        slot.total_consumption = (i64::from(slot.total_consumption) + change) as Energy;

        // Only the level at the slot's exit moves; the entry level just
        // carries the delta accumulated so far.
        match slot.kind {
            SlotKind::Charging => {
                slot.min_level += *batt_delta;
                slot.max_level += *batt_delta - change;
            }
            SlotKind::Discharging => {
                slot.max_level += *batt_delta;
                slot.min_level += *batt_delta - change;
            }
            SlotKind::Constant => {
                // Any nonzero change makes the trajectory monotone, so
                // the kind follows the direction of the new exit level.
                if change > 0 {
                    slot.kind = SlotKind::Discharging;
                    slot.max_level += *batt_delta;
                    slot.min_level += *batt_delta - change;
                } else if change < 0 {
                    slot.kind = SlotKind::Charging;
                    slot.min_level += *batt_delta;
                    slot.max_level += *batt_delta - change;
                } else {
                    slot.min_level += *batt_delta;
                    slot.max_level += *batt_delta;
                }
            }
        }

        *batt_delta -= change;
    }

    if error > 0 {
        log_warn!("{} watt-ticks of {} left unrecovered", error, kind.name());
        return Err(PlanError::Unrecoverable {
            kind,
            residual: error,
        });
    }

    Ok(())
}
