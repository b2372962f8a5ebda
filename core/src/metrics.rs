//! Aggregate service metrics, derived from the passenger pools each
//! time they are asked for, never stored independently.

use crate::passenger::Passenger;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimMetrics {
    /// Mean pickup − request over completed passengers, seconds.
    pub avg_wait_time: f64,
    /// Mean dropoff − pickup over completed passengers, seconds.
    pub avg_travel_time: f64,
    pub passengers_served: usize,
    /// Completed + waiting + onboard.
    pub total_passengers: usize,
}

impl SimMetrics {
    pub fn compute(completed: &[Passenger], waiting: usize, onboard: usize) -> Self {
        let waits: Vec<f64> = completed.iter().filter_map(|p| p.wait_time()).collect();
        let travels: Vec<f64> = completed.iter().filter_map(|p| p.travel_time()).collect();
        Self {
            avg_wait_time: mean(&waits),
            avg_travel_time: mean(&travels),
            passengers_served: completed.len(),
            total_passengers: completed.len() + waiting + onboard,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
