//! Simulation configuration and its validation rules.
//!
//! Configuration is validated before a run starts; a running
//! simulation never sees an invalid config. Changing the building
//! topology (floors, elevator count) forces a full reset; live
//! topology changes are deliberately unsupported.

use crate::elevator::ElevatorTiming;
use crate::error::{SimError, SimResult};
use crate::types::MAX_FLOORS;
use serde::{Deserialize, Serialize};

pub const MIN_FLOOR_COUNT: usize = 3;
pub const MAX_FLOOR_COUNT: usize = MAX_FLOORS;
pub const MIN_ELEVATOR_COUNT: usize = 1;
pub const MAX_ELEVATOR_COUNT: usize = 8;

/// Scheduler rate at speed multiplier 1.0.
pub const BASE_TICK_RATE: f64 = 10.0;
pub const MIN_SPEED: f64 = 0.25;
pub const MAX_SPEED: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of floors, ground included. 3..=60.
    pub floors: usize,
    /// 1..=8.
    pub elevator_count: usize,
    /// Passenger arrivals per minute. Zero means no arrivals.
    pub spawn_rate: f64,
    pub seed: i64,
    /// Per-elevator passenger capacity.
    pub capacity: usize,
    pub timing: ElevatorTiming,
    /// Spawner stops feeding a floor once this many passengers wait
    /// there.
    pub max_waiting_per_floor: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            floors: 10,
            elevator_count: 2,
            spawn_rate: 6.0,
            seed: 1,
            capacity: 8,
            timing: ElevatorTiming::default(),
            max_waiting_per_floor: 20,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !(MIN_FLOOR_COUNT..=MAX_FLOOR_COUNT).contains(&self.floors) {
            return Err(SimError::FloorCountOutOfRange {
                got: self.floors,
                min: MIN_FLOOR_COUNT,
                max: MAX_FLOOR_COUNT,
            });
        }
        if !(MIN_ELEVATOR_COUNT..=MAX_ELEVATOR_COUNT).contains(&self.elevator_count) {
            return Err(SimError::ElevatorCountOutOfRange {
                got: self.elevator_count,
                min: MIN_ELEVATOR_COUNT,
                max: MAX_ELEVATOR_COUNT,
            });
        }
        if self.spawn_rate < 0.0 || !self.spawn_rate.is_finite() {
            return Err(SimError::InvalidSpawnRate { got: self.spawn_rate });
        }
        Ok(())
    }
}

/// Partial update from the control surface. Only present fields are
/// applied; floors or elevator_count force a reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigPatch {
    pub floors: Option<usize>,
    pub elevator_count: Option<usize>,
    pub spawn_rate: Option<f64>,
    pub seed: Option<i64>,
}

impl ConfigPatch {
    /// Merge into `config`, validating the result before anything is
    /// mutated. Returns whether the change requires a full reset.
    pub fn apply(&self, config: &mut SimConfig) -> SimResult<bool> {
        let mut candidate = config.clone();
        if let Some(floors) = self.floors {
            candidate.floors = floors;
        }
        if let Some(count) = self.elevator_count {
            candidate.elevator_count = count;
        }
        if let Some(rate) = self.spawn_rate {
            candidate.spawn_rate = rate;
        }
        if let Some(seed) = self.seed {
            candidate.seed = seed;
        }
        candidate.validate()?;
        let needs_reset =
            candidate.floors != config.floors || candidate.elevator_count != config.elevator_count;
        *config = candidate;
        Ok(needs_reset)
    }
}
