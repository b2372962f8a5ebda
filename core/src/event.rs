//! Simulation events: the observable record of everything that
//! happened, in order.
//!
//! The engine appends events as it processes each tick. The retained
//! log is the determinism witness: two runs with the same seed must
//! produce byte-identical serialized logs.

use crate::types::{ElevatorId, Floor, PassengerId, SimTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    PassengerRequested {
        id: PassengerId,
        floor: Floor,
        destination: Floor,
        time: SimTime,
    },
    PassengerPickedUp {
        id: PassengerId,
        elevator_id: ElevatorId,
        floor: Floor,
        time: SimTime,
    },
    PassengerDelivered {
        id: PassengerId,
        elevator_id: ElevatorId,
        floor: Floor,
        time: SimTime,
    },
    ElevatorArrived {
        elevator_id: ElevatorId,
        floor: Floor,
        time: SimTime,
    },
    DoorsOpened {
        elevator_id: ElevatorId,
        floor: Floor,
        time: SimTime,
    },
    DoorsClosed {
        elevator_id: ElevatorId,
        floor: Floor,
        time: SimTime,
    },
    TickCompleted {
        time: SimTime,
        waiting: usize,
        onboard: usize,
        served: usize,
    },
}
