//! Per-Tick Energy Bounds
//!
//! Consumption bounds are per harvesting tick and bracket what the duty
//! cycle can physically express: `E_CONS_MIN` is the node ticking over and
//! sending only its own packets, `E_CONS_MAX` is the radio held on for the
//! whole tick. The allowance published to the rate controller is always
//! inside this window.

/// Least energy the node consumes in one tick (watt-ticks).
///
/// Measured with the radio duty-cycled to one data packet per tick. The
/// planner uses this as the default consumption floor; a schedule that
/// cannot even afford the floor is reported as a scheduling failure.
pub const E_CONS_MIN: u32 = 155;

/// Most energy the node can consume in one tick (watt-ticks).
///
/// Measured with the receiver constantly on. Consumption above this is
/// not achievable, so charging slots cap their consumption here and any
/// remaining surplus charges the battery.
pub const E_CONS_MAX: u32 = 117_964;

/// Upper cap on a single harvest sample (watt-ticks).
///
/// The ingestion layer clamps raw harvester readings to this value before
/// they reach the predictor or the core; the planner may therefore assume
/// every prediction entry is `<= HARVEST_CAP`.
pub const HARVEST_CAP: u32 = 10_048_575;
