//! Pass 3: Offset Correction
//!
//! After error correction the cycle ends wherever the corrected
//! trajectory happens to land. This pass eliminates the gap to the
//! desired end-of-cycle level (the energy-neutrality condition) by
//! walking the slots *backward* from the last one:
//!
//! - a positive offset (ended too low) is absorbed by consuming less in
//!   slots that do not fall (charging/constant)
//! - a negative offset (ended too high) is absorbed by consuming more in
//!   slots that do not rise (discharging/constant)
//!
//! Moving backward, the pass keeps a running cap: the tightest distance
//! from any already-visited slot's entry level to the threshold the
//! offset pushes toward. Earlier slots may never recover more than that
//! cap, or they would shove a later slot past a bound it already grazes.
//!
//! Only consumption totals change here; slot levels are not rewritten;
//! nothing reads them after this pass. Whatever offset survives the walk
//! is returned as accepted drift for telemetry, never as an error.

use crate::constants::{BATT_MAX, BATT_MIN};
use crate::schedule::Schedule;
use crate::slot::Energy;

/// Walks the schedule backward, converging the end level on `target`.
///
/// `battery_delta` is the leftover level shift from error correction,
/// applied when computing the achieved end level. Returns the residual
/// offset (`target - achieved`, after correction); its magnitude shrinks
/// monotonically as the walk proceeds.
pub(super) fn correct_offset(
    schedule: &mut Schedule,
    target: Energy,
    floor: Energy,
    battery_delta: i64,
) -> i64 {
    let slots = schedule.slots_mut();
    let Some(last) = slots.last() else {
        return 0;
    };

    let achieved = last.exit_level() + battery_delta;
    let mut offset = i64::from(target) - achieved;
    let mut cap = offset.abs();

    log_debug!("end level {} vs target {}, offset {}", achieved, target, offset);

    for idx in (0..slots.len()).rev() {
        let slot = &mut slots[idx];

        let change: i64 = if offset > 0 && slot.is_rising() {
            // Consume less so the level climbs toward the target
            -offset.min(i64::from(slot.max_decrease(floor)))
        } else if offset < 0 && slot.is_falling() {
            // Consume more so the level sinks toward the target
            (-offset).min(i64::from(slot.max_increase()))
        } else {
            0
        };

        offset += change;
        slot.total_consumption = (i64::from(slot.total_consumption) + change) as Energy;

        if offset == 0 {
            break;
        }

        // Earlier slots shift every level from here on; cap their
        // recovery by this slot's remaining distance to the threshold.
        let entry = if slot.is_rising() {
            slot.min_level
        } else {
            slot.max_level
        };
        let distance = if offset > 0 {
            i64::from(BATT_MAX) - entry
        } else {
            entry - i64::from(BATT_MIN)
        };
        cap = cap.min(distance.max(0));

        if offset.abs() > cap {
            offset = offset.signum() * cap;
        }
    }

    offset
}
