//! Floor Raise
//!
//! Lifts every slot's consumption to at least a new per-tick floor
//! without creating depletion errors. Deployments use this when the
//! node's baseline duty cycle has to go up mid-cycle (a denser reporting
//! interval, a retransmission-heavy link) and the planned schedule was
//! computed against the old floor.
//!
//! Raising consumption anywhere lowers the battery trajectory everywhere
//! after it, so each slot's raise is capped by the tightest remaining
//! distance to `BATT_MIN` from that slot to the end of the cycle. The
//! difference between what was wanted and what fit is not an error: it
//! simply lands in the end-of-cycle offset, like any other accepted
//! drift.

use crate::planner::correction::tightest_margin;
use crate::schedule::Schedule;
use crate::slot::{Energy, ErrorKind, SlotKind};

/// Raises per-tick consumption toward `new_floor` wherever the battery
/// margin allows it.
///
/// Returns the total consumption added across the cycle, which is exactly the
/// amount by which the end-of-cycle level will drop relative to the
/// original plan.
pub fn raise_floor(schedule: &mut Schedule, new_floor: Energy) -> Energy {
    debug_assert!(new_floor <= crate::constants::E_CONS_MAX);

    let slots = schedule.slots_mut();

    // Accumulated extra consumption applied so far; every slot after the
    // raises sits lower by this amount.
    let mut delta: i64 = 0;

    for idx in 0..slots.len() {
        let wanted = i64::from(new_floor) * i64::from(slots[idx].length)
            - i64::from(slots[idx].total_consumption);
        // Lowering the trajectory must not cross BATT_MIN anywhere from
        // here to the end; levels from idx on are stored pre-delta.
        let allowed = tightest_margin(slots, idx, slots.len(), ErrorKind::Waste) - delta;
        let change = wanted.min(allowed);

        let slot = &mut slots[idx];
        slot.min_level -= delta;
        slot.max_level -= delta;

        if change > 0 {
            slot.total_consumption = (i64::from(slot.total_consumption) + change) as Energy;
            delta += change;

            // Only the exit level drops further by this slot's own raise
            match slot.kind {
                SlotKind::Charging => slot.max_level -= change,
                SlotKind::Discharging => slot.min_level -= change,
                SlotKind::Constant => {
                    slot.kind = SlotKind::Discharging;
                    slot.min_level -= change;
                }
            }
        }
    }

    delta as Energy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BATT_MIN, E_CONS_MAX, E_CONS_MIN};
    use crate::slot::BatterySlot;

    const MIN: i64 = BATT_MIN as i64;

    fn slot(kind: SlotKind, length: u16, min: i64, max: i64, total: Energy) -> BatterySlot {
        BatterySlot {
            kind,
            start_tick: 0,
            length,
            min_level: min,
            max_level: max,
            total_consumption: total,
        }
    }

    fn schedule_of(slots: &[BatterySlot]) -> Schedule {
        let mut schedule = Schedule::new();
        for s in slots {
            schedule.push(*s).unwrap();
        }
        schedule
    }

    #[test]
    fn raises_floor_slots_up_to_margin() {
        // Two discharging slots at the old floor, comfortably above
        // BATT_MIN: both get raised all the way to the new floor.
        let high = MIN + 50_000;
        let mut schedule = schedule_of(&[
            slot(SlotKind::Discharging, 10, high - 1_550, high, 10 * E_CONS_MIN),
            slot(
                SlotKind::Discharging,
                10,
                high - 3_100,
                high - 1_550,
                10 * E_CONS_MIN,
            ),
        ]);

        let new_floor = E_CONS_MIN + 200;
        let added = raise_floor(&mut schedule, new_floor);

        assert_eq!(added, 2 * 10 * 200);
        assert_eq!(
            schedule.slot(1).unwrap().total_consumption,
            10 * new_floor
        );
        assert_eq!(
            schedule.slot(2).unwrap().total_consumption,
            10 * new_floor
        );
        // Second slot's trajectory dropped by the first slot's raise
        // plus its own
        assert_eq!(
            schedule.slot(2).unwrap().min_level,
            high - 3_100 - 2_000 - 2_000
        );
        assert!(schedule.slot(2).unwrap().min_level >= MIN);
    }

    #[test]
    fn charging_slots_never_need_a_raise() {
        let mut schedule = schedule_of(&[slot(
            SlotKind::Charging,
            10,
            MIN + 5_000,
            MIN + 9_000,
            10 * E_CONS_MAX,
        )]);
        let before = schedule.clone();

        let added = raise_floor(&mut schedule, E_CONS_MIN + 500);
        assert_eq!(added, 0);
        assert_eq!(schedule, before);
    }

    #[test]
    fn margin_limits_the_raise() {
        // The slot sits 800 above BATT_MIN at its lowest; a raise that
        // wants 2_000 only gets 800.
        let mut schedule = schedule_of(&[slot(
            SlotKind::Discharging,
            10,
            MIN + 800,
            MIN + 2_350,
            10 * E_CONS_MIN,
        )]);

        let added = raise_floor(&mut schedule, E_CONS_MIN + 200);
        assert_eq!(added, 800);
        assert_eq!(schedule.slot(1).unwrap().min_level, MIN);
    }

    #[test]
    fn constant_slot_converts_when_raised() {
        // A new floor above the slot's harvest-matched consumption turns
        // the flat slot into a draining one.
        let flat = MIN + 30_000;
        let mut schedule = schedule_of(&[slot(SlotKind::Constant, 10, flat, flat, 10 * 60_000)]);

        let added = raise_floor(&mut schedule, 60_500);
        assert_eq!(added, 5_000);
        let s = schedule.slot(1).unwrap();
        assert_eq!(s.kind, SlotKind::Discharging);
        assert_eq!(s.total_consumption, 10 * 60_500);
        assert_eq!(s.min_level, flat - 5_000);
        assert_eq!(s.max_level, flat);
    }
}
