//! Shared primitive types used across the entire simulation.

use serde::{Deserialize, Serialize};

/// Simulation time in seconds. Always derived from tick deltas,
/// never from the wall clock.
pub type SimTime = f64;

/// A floor index, 0 = ground.
pub type Floor = usize;

/// A stable, process-unique passenger identifier.
pub type PassengerId = u64;

/// An elevator's index in the orchestrator's fixed collection.
pub type ElevatorId = usize;

/// Hard upper bound on floor count. A building never exceeds 60
/// floors, so a floor set fits in a single u64.
pub const MAX_FLOORS: usize = 60;

/// A small set of floor indices backed by one u64.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloorSet {
    bits: u64,
}

impl FloorSet {
    pub fn new() -> Self {
        Self { bits: 0 }
    }

    pub fn insert(&mut self, floor: Floor) {
        debug_assert!(floor < 64, "floor {floor} out of bitset range");
        self.bits |= 1 << floor;
    }

    pub fn remove(&mut self, floor: Floor) {
        self.bits &= !(1 << floor);
    }

    pub fn contains(&self, floor: Floor) -> bool {
        floor < 64 && self.bits & (1 << floor) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn union(&self, other: &FloorSet) -> FloorSet {
        FloorSet { bits: self.bits | other.bits }
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    /// Iterate contained floors in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Floor> + '_ {
        let bits = self.bits;
        (0..64).filter(move |f| bits & (1 << f) != 0)
    }
}
