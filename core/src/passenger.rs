//! The passenger record and its timestamp lifecycle.
//!
//! requestTime is set at spawn, pickupTime by the boarding elevator,
//! dropoffTime by the disembarking elevator. After dropoff the record
//! moves to the orchestrator's completed pool and is never mutated
//! again.

use crate::types::{Floor, PassengerId, SimTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub id: PassengerId,
    pub start_floor: Floor,
    pub destination_floor: Floor,
    /// Simulation second at which the travel request was made.
    pub request_time: SimTime,
    pub pickup_time: Option<SimTime>,
    pub dropoff_time: Option<SimTime>,
}

impl Passenger {
    pub fn new(
        id: PassengerId,
        start_floor: Floor,
        destination_floor: Floor,
        request_time: SimTime,
    ) -> Self {
        debug_assert_ne!(start_floor, destination_floor);
        Self {
            id,
            start_floor,
            destination_floor,
            request_time,
            pickup_time: None,
            dropoff_time: None,
        }
    }

    /// Mark the passenger as picked up. Called once, by the elevator
    /// that boards it.
    pub fn board(&mut self, now: SimTime) {
        debug_assert!(now >= self.request_time);
        self.pickup_time = Some(now);
    }

    /// Mark the passenger as delivered. Called once, by the elevator
    /// that disembarks it.
    pub fn complete(&mut self, now: SimTime) {
        debug_assert!(self.pickup_time.is_some_and(|t| now >= t));
        self.dropoff_time = Some(now);
    }

    /// Seconds spent waiting on the start floor, if picked up.
    pub fn wait_time(&self) -> Option<SimTime> {
        self.pickup_time.map(|t| t - self.request_time)
    }

    /// Seconds spent riding, if delivered.
    pub fn travel_time(&self) -> Option<SimTime> {
        match (self.pickup_time, self.dropoff_time) {
            (Some(pickup), Some(dropoff)) => Some(dropoff - pickup),
            _ => None,
        }
    }
}
