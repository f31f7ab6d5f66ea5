//! Cycle Orchestration
//!
//! ## Overview
//!
//! One object owns the schedule and drives everything from a single
//! entry point, [`Orchestrator::handle_sample`], called once per
//! harvesting tick by the ingestion layer. The control flow is an
//! explicit two-state machine:
//!
//! ```text
//!                 tick == 0 (recompute schedule)
//! AwaitingCycleStart ──────────────────────────────► InCycle ─┐
//!         ▲                                            ▲      │ every tick:
//!         │ power-on                        tick == 0  │      │ online
//!         └───                              (recompute)└──────┘ allocation
//! ```
//!
//! The node boots mid-cycle with no idea what the day looks like, so it
//! stays in `AwaitingCycleStart`, publishing no allowance, until the
//! tick index first wraps to zero. From then on every wrap synchronously
//! recomputes the schedule *before* the same tick's online handling
//! reads it: consumers only ever observe the old table or the fully
//! rebuilt one.
//!
//! ## Degraded Cycles
//!
//! When the planner reports an unrecoverable violation the cycle runs
//! degraded: the schedule is dropped and the node holds the consumption
//! floor until the next cycle boundary gives the planner another chance.
//! The failure stays readable through
//! [`plan_status`](Orchestrator::plan_status) so the application can
//! raise telemetry; it is never a panic.

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

use crate::allocator::{Allowance, OnlineAllocator};
use crate::constants::{E_CONS_MIN, TARGET_END_LEVEL};
use crate::errors::PlanError;
use crate::planner::{plan, PlanReport, PlanRequest};
use crate::schedule::Schedule;
use crate::slot::Energy;
use crate::traits::{BatteryProbe, HarvestPredictor};

/// One harvesting tick's measurement, delivered by the ingestion layer
#[derive(Debug, Clone, Copy)]
pub struct HarvestSample {
    /// Measured harvest for this tick, pre-capped at
    /// [`HARVEST_CAP`](crate::constants::HARVEST_CAP) (watt-ticks).
    ///
    /// The predictor upstream already folded this value into its state;
    /// the core only logs it.
    pub harvested: Energy,
    /// Tick index within the cycle, `0..TICKS_PER_CYCLE`
    pub tick: u16,
}

/// Where the orchestrator is in its cycle state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// No cycle boundary observed yet; no schedule, no allowance
    AwaitingCycleStart,
    /// A schedule (or a degraded fallback) is live for the current cycle
    InCycle,
}

/// Outcome of the most recent schedule recompute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStatus {
    /// The planner produced a usable schedule
    Planned(PlanReport),
    /// The planner failed; the cycle is running at the consumption floor
    Failed(PlanError),
}

/// Owner of the schedule and single driver of the scheduling core
#[derive(Debug)]
pub struct Orchestrator {
    schedule: Schedule,
    allocator: OnlineAllocator,
    state: CycleState,
    /// Running the conservative floor fallback for this cycle
    degraded: bool,
    /// Per-tick consumption floor handed to every pass
    floor: Energy,
    last_allowance: Option<Allowance>,
    last_plan: Option<PlanStatus>,
}

impl Orchestrator {
    /// Creates an orchestrator with the default consumption floor
    /// (`E_CONS_MIN`)
    pub const fn new() -> Self {
        Self::with_floor(E_CONS_MIN)
    }

    /// Creates an orchestrator planning against a custom consumption
    /// floor (at least `E_CONS_MIN`)
    pub const fn with_floor(floor: Energy) -> Self {
        Self {
            schedule: Schedule::new(),
            allocator: OnlineAllocator::new(),
            state: CycleState::AwaitingCycleStart,
            degraded: false,
            floor,
            last_allowance: None,
            last_plan: None,
        }
    }

    /// Handles one harvesting tick.
    ///
    /// On a cycle boundary (`sample.tick == 0`) the schedule is
    /// recomputed first, synchronously; then the tick is allocated
    /// against the (possibly fresh) schedule. Returns the allowance
    /// published for this tick, or `None` while no cycle has started
    /// yet.
    pub fn handle_sample<B, P>(
        &mut self,
        sample: HarvestSample,
        battery: &B,
        predictor: &P,
    ) -> Option<Allowance>
    where
        B: BatteryProbe,
        P: HarvestPredictor,
    {
        if sample.tick == 0 {
            self.recompute(battery.level(), predictor);
        }

        match self.state {
            CycleState::AwaitingCycleStart => {
                log_debug!(
                    "sample before first cycle start (tick {}), no allowance",
                    sample.tick
                );
                None
            }
            CycleState::InCycle => {
                let allowance = if self.degraded {
                    Allowance::from_energy(self.floor)
                } else {
                    self.allocator.on_tick(
                        &self.schedule,
                        battery.level(),
                        predictor.predicted(sample.tick),
                        self.floor,
                    )
                };
                log_debug!(
                    "tick {}: harvested {}, allowance {} ({}/255)",
                    sample.tick,
                    sample.harvested,
                    allowance.energy,
                    allowance.scaled
                );
                self.last_allowance = Some(allowance);
                Some(allowance)
            }
        }
    }

    /// Recomputes the schedule for a new cycle from the latest
    /// prediction and battery level
    fn recompute<P: HarvestPredictor>(&mut self, battery: Energy, predictor: &P) {
        let request = PlanRequest {
            start_level: battery,
            target_level: TARGET_END_LEVEL,
            floor: self.floor,
            // The very first run of a cycle plans without the offset
            // pass; residual drift is corrected online against reality
            // instead of against the prediction.
            correct_offset: false,
        };

        match plan(&mut self.schedule, &request, predictor.cycle_prediction()) {
            Ok(report) => {
                log_debug!(
                    "cycle planned: {} slots, delta {}",
                    report.slots,
                    report.battery_delta
                );
                self.degraded = false;
                self.last_plan = Some(PlanStatus::Planned(report));
            }
            Err(err) => {
                log_warn!("cycle plan failed, holding consumption floor");
                self.schedule.clear();
                self.degraded = true;
                self.last_plan = Some(PlanStatus::Failed(err));
            }
        }

        self.allocator.begin_cycle();
        self.state = CycleState::InCycle;
    }

    /// Last published allowance in its 8-bit form, for the rate
    /// controller; `None` while no allowance has been computed
    pub fn allowance_8bit(&self) -> Option<u8> {
        self.last_allowance.map(|a| a.scaled)
    }

    /// Last published allowance, if any
    pub fn allowance(&self) -> Option<Allowance> {
        self.last_allowance
    }

    /// Read-only view of the live schedule (empty while degraded or
    /// before the first cycle)
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Outcome of the most recent recompute, if one has run
    pub fn plan_status(&self) -> Option<&PlanStatus> {
        self.last_plan.as_ref()
    }

    /// Whether the current cycle is running the floor fallback
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Current state-machine position
    pub fn state(&self) -> CycleState {
        self.state
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}
