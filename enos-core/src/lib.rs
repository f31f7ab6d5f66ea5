//! Energy-neutral operation scheduler for harvesting sensor nodes
//!
//! Plans how much energy a battery-powered, energy-harvesting node may
//! consume in each time slot of a day-long cycle, so the battery never
//! drains below its safety floor or overflows its capacity, and ends the
//! cycle back at a target level. A real-time layer re-estimates the
//! allowance every tick as measured harvest and battery levels drift
//! from the prediction.
//!
//! Key constraints:
//! - Integer arithmetic only (watt-ticks), exact on MCU-class hardware
//! - No heap allocation anywhere; all storage is capacity-bounded at
//!   compile time
//! - Single-threaded and event-driven: one sample in, one allowance out
//!
//! ```no_run
//! use enos_core::{Orchestrator, HarvestSample, BatteryProbe, HarvestPredictor};
//! # use enos_core::constants::TICKS_PER_CYCLE;
//! # struct Battery; struct Predictor([u32; TICKS_PER_CYCLE]);
//! # impl BatteryProbe for Battery { fn level(&self) -> u32 { 0 } }
//! # impl HarvestPredictor for Predictor {
//! #     fn cycle_prediction(&self) -> &[u32; TICKS_PER_CYCLE] { &self.0 }
//! # }
//! # let (battery, predictor) = (Battery, Predictor([0; TICKS_PER_CYCLE]));
//!
//! let mut orchestrator = Orchestrator::new();
//!
//! // Once per harvesting tick, from the ingestion layer:
//! let sample = HarvestSample { harvested: 4_200, tick: 0 };
//! if let Some(allowance) = orchestrator.handle_sample(sample, &battery, &predictor) {
//!     // hand allowance.scaled to the transport rate controller
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod allocator;
pub mod constants;
pub mod errors;
pub mod orchestrator;
pub mod planner;
pub mod schedule;
pub mod slot;
pub mod traits;

// Public API
pub use allocator::{scale_to_8bit, Allowance, OnlineAllocator};
pub use errors::{PlanError, PlanResult};
pub use orchestrator::{CycleState, HarvestSample, Orchestrator, PlanStatus};
pub use planner::{plan, raise_floor, PlanReport, PlanRequest};
pub use schedule::Schedule;
pub use slot::{BatterySlot, Energy, ErrorKind, SlotKind};
pub use traits::{BatteryProbe, HarvestPredictor};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
