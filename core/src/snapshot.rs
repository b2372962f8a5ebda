//! The full per-tick read surface for UI layers: status, every
//! elevator's public state, the waiting pool, and computed metrics.

use crate::elevator::ElevatorState;
use crate::metrics::SimMetrics;
use crate::passenger::Passenger;
use crate::types::SimTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimStatus {
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub status: SimStatus,
    /// Simulation seconds since the run began.
    pub time: SimTime,
    pub elevators: Vec<ElevatorState>,
    pub waiting: Vec<Passenger>,
    pub metrics: SimMetrics,
}
