//! Cycle Geometry
//!
//! A cycle is one full period of the harvest pattern (a day). It is split
//! into a fixed number of harvesting ticks; the schedule is recomputed
//! once per cycle when the tick index wraps to zero.

/// Minutes per harvesting tick.
///
/// Documentation only; the core never touches wall-clock time; the
/// ingestion layer owns the timer that paces samples.
pub const TICK_MINUTES: u32 = 10;

/// Harvesting ticks per cycle (one day at [`TICK_MINUTES`] per tick).
pub const TICKS_PER_CYCLE: usize = 144;

/// Capacity of the battery-slot table.
///
/// Worst case is a classification change on every tick, one battery slot
/// per harvesting tick. Sizing the table to that bound means the
/// partitioner can never overflow it for a valid prediction array.
pub const MAX_BATTERY_SLOTS: usize = TICKS_PER_CYCLE;
