//! Compile-Time Configuration for the Scheduler
//!
//! Every tunable of the scheduler is a compile-time constant: the target
//! class of hardware has no configuration store, and the planner's arrays
//! are sized from these values. Constants are grouped by domain:
//!
//! - **Battery**: safe operating window and end-of-cycle target
//! - **Energy**: per-tick consumption bounds and the harvest input cap
//! - **Cycle**: cycle geometry (ticks per cycle, slot table capacity)
//!
//! All energy values are in *watt-ticks* (watts times scheduler ticks),
//! the unit the battery accounting hardware reports in. Integer
//! throughout; there is no floating point anywhere in this crate.

/// Battery operating window and end-of-cycle target level.
pub mod battery;

/// Per-tick consumption bounds and harvest input limits.
pub mod energy;

/// Cycle geometry: tick period, ticks per cycle, slot table capacity.
pub mod cycle;

// Re-export the constants that nearly every module touches
pub use battery::{BATT_CAPACITY, BATT_MAX, BATT_MIN, TARGET_END_LEVEL};
pub use cycle::{MAX_BATTERY_SLOTS, TICKS_PER_CYCLE};
pub use energy::{E_CONS_MAX, E_CONS_MIN, HARVEST_CAP};
