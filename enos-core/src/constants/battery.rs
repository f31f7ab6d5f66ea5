//! Battery Operating Window
//!
//! The scheduler never plans the battery outside `[BATT_MIN, BATT_MAX]`.
//! Both bounds are *usable-energy* levels in watt-ticks, not cell voltages:
//! the battery accounting module owns the conversion from duty-cycle
//! counters to watt-ticks and reports a single scalar level.

/// Lowest battery level the node may be planned down to (watt-ticks).
///
/// Below this level the radio and MCU brown out and the node powers down,
/// so the planner treats any projected excursion under `BATT_MIN` as an
/// overspend error that must be corrected or reported.
pub const BATT_MIN: u32 = 100_000_000;

/// Highest battery level the storage element can hold (watt-ticks).
///
/// Harvest arriving while the battery sits at `BATT_MAX` is lost; the
/// planner treats any projected excursion over `BATT_MAX` as a waste
/// error and raises consumption ahead of the peak to absorb it.
pub const BATT_MAX: u32 = 1_000_000_000;

/// Usable storage between the two bounds (watt-ticks).
pub const BATT_CAPACITY: u32 = BATT_MAX - BATT_MIN;

/// Battery level the node aims to end each cycle at (watt-ticks).
///
/// Energy-neutral operation converges back to this level at the cycle
/// boundary. Aiming for a full battery gives the largest reserve against
/// a poor-harvest day following a good one.
pub const TARGET_END_LEVEL: u32 = BATT_MAX;
