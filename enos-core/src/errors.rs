//! Error Types for Schedule Computation
//!
//! The planner's error type follows the same rules as the rest of the
//! crate's hot-path data:
//!
//! 1. **Small and `Copy`**: errors are returned once per cycle at most,
//!    but they may be stored by the orchestrator for later inspection,
//!    so they carry no heap data and copy freely.
//! 2. **Actionable**: a failed plan is not a crash. The variants carry
//!    enough context (error direction, residual magnitude) for the caller
//!    to decide between falling back to the consumption floor and raising
//!    an operator alarm.
//!
//! A failed plan is *fatal for the cycle*, not for the node: the
//! orchestrator substitutes the conservative floor allowance until the
//! next cycle boundary and reports the failure through
//! [`plan_status`](crate::orchestrator::Orchestrator::plan_status).

use thiserror_no_std::Error;

use crate::slot::ErrorKind;

/// Result type for planning operations
pub type PlanResult<T> = Result<T, PlanError>;

/// Planning errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    /// A projected battery violation could not be cancelled by moving
    /// consumption between slots; the cycle's schedule is unusable.
    #[error("unrecoverable {kind} error, {residual} watt-ticks left after redistribution")]
    Unrecoverable {
        /// Direction of the violation that survived redistribution
        kind: ErrorKind,
        /// Error magnitude still uncancelled at the window end (watt-ticks)
        residual: i64,
    },

    /// The battery-slot table ran out of capacity.
    ///
    /// Cannot occur for a well-formed prediction array (the table is
    /// sized to one slot per tick); reported rather than asserted so the
    /// bound stays explicit.
    #[error("battery slot table full ({capacity} slots)")]
    TableFull {
        /// Compile-time capacity of the slot table
        capacity: usize,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for PlanError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Unrecoverable { kind, residual } => {
                defmt::write!(fmt, "unrecoverable {} error, {} left", kind.name(), residual)
            }
            Self::TableFull { capacity } => {
                defmt::write!(fmt, "slot table full ({})", capacity)
            }
        }
    }
}
