//! The elevator state machine.
//!
//! Each elevator exclusively owns its internal state: floor position,
//! direction, door cycle, onboard passengers, and request sets. The
//! orchestrator drives it through exactly three entry points per tick:
//! step(), execute_command(), and the boarding/disembarking pair.
//!
//! RULES:
//!   - Command rejection is a silent boolean, never an error. Callers
//!     poll state and try a different action next tick.
//!   - Doors are never open or opening while the car is moving.
//!   - All timed transitions are countdown fields advanced in step().
//!     Nothing fires asynchronously.

use crate::command::CommandAction;
use crate::passenger::Passenger;
use crate::types::{ElevatorId, Floor, FloorSet, PassengerId, SimTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Idle,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Durations of the elevator's timed transitions, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevatorTiming {
    /// One floor-to-floor move.
    pub floor_travel_time: SimTime,
    /// One opening or closing door transition.
    pub door_operation_time: SimTime,
    /// How long doors stay open before auto-closing.
    pub door_hold_time: SimTime,
}

impl Default for ElevatorTiming {
    fn default() -> Self {
        Self {
            floor_travel_time: 1.5,
            door_operation_time: 1.5,
            door_hold_time: 2.0,
        }
    }
}

/// The immutable public snapshot handed to dispatch algorithms and
/// the UI layer. Internal timers and request bookkeeping stay private.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevatorState {
    pub id: ElevatorId,
    pub current_floor: Floor,
    pub direction: Direction,
    pub door_state: DoorState,
    pub passengers: Vec<Passenger>,
    pub capacity: usize,
    /// Union of pending pickup and dropoff floors.
    pub target_floors: FloorSet,
}

pub struct Elevator {
    id: ElevatorId,
    floor_count: usize,
    current_floor: Floor,
    direction: Direction,
    door_state: DoorState,
    passengers: Vec<Passenger>,
    capacity: usize,
    timing: ElevatorTiming,
    pickup_floors: FloorSet,
    dropoff_floors: FloorSet,
    /// Destination of an in-progress move.
    target_floor: Option<Floor>,
    is_moving: bool,
    move_timer: SimTime,
    door_timer: SimTime,
    hold_timer: SimTime,
}

impl Elevator {
    pub fn new(
        id: ElevatorId,
        floor_count: usize,
        start_floor: Floor,
        capacity: usize,
        timing: ElevatorTiming,
    ) -> Self {
        debug_assert!(start_floor < floor_count);
        Self {
            id,
            floor_count,
            current_floor: start_floor,
            direction: Direction::Idle,
            door_state: DoorState::Closed,
            passengers: Vec::new(),
            capacity,
            timing,
            pickup_floors: FloorSet::new(),
            dropoff_floors: FloorSet::new(),
            target_floor: None,
            is_moving: false,
            move_timer: 0.0,
            door_timer: 0.0,
            hold_timer: 0.0,
        }
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn id(&self) -> ElevatorId {
        self.id
    }

    pub fn current_floor(&self) -> Floor {
        self.current_floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn door_state(&self) -> DoorState {
        self.door_state
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn passenger_count(&self) -> usize {
        self.passengers.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Floors with pending pickup or dropoff demand.
    pub fn requested_floors(&self) -> FloorSet {
        self.pickup_floors.union(&self.dropoff_floors)
    }

    pub fn should_stop_at_current_floor(&self) -> bool {
        self.requested_floors().contains(self.current_floor)
    }

    /// Immutable snapshot of the public state.
    pub fn state(&self) -> ElevatorState {
        ElevatorState {
            id: self.id,
            current_floor: self.current_floor,
            direction: self.direction,
            door_state: self.door_state,
            passengers: self.passengers.clone(),
            capacity: self.capacity,
            target_floors: self.requested_floors(),
        }
    }

    // ── Commands ───────────────────────────────────────────────

    /// Execute one dispatch command. Returns false, with no state
    /// change, when the current state rejects the action.
    pub fn execute_command(&mut self, action: CommandAction) -> bool {
        match action {
            CommandAction::MoveUp => self.begin_move(Direction::Up),
            CommandAction::MoveDown => self.begin_move(Direction::Down),
            CommandAction::OpenDoors => self.begin_opening(),
            CommandAction::CloseDoors => self.begin_closing(),
            CommandAction::Wait => true,
        }
    }

    fn begin_move(&mut self, direction: Direction) -> bool {
        if self.is_moving || self.door_state != DoorState::Closed {
            return false;
        }
        let target = match direction {
            Direction::Up if self.current_floor + 1 < self.floor_count => self.current_floor + 1,
            Direction::Down if self.current_floor > 0 => self.current_floor - 1,
            _ => return false, // at a terminal floor
        };
        self.target_floor = Some(target);
        self.direction = direction;
        self.is_moving = true;
        self.move_timer = self.timing.floor_travel_time;
        true
    }

    fn begin_opening(&mut self) -> bool {
        if self.is_moving || matches!(self.door_state, DoorState::Open | DoorState::Opening) {
            return false;
        }
        self.door_state = DoorState::Opening;
        self.door_timer = self.timing.door_operation_time;
        true
    }

    fn begin_closing(&mut self) -> bool {
        if self.is_moving || matches!(self.door_state, DoorState::Closed | DoorState::Closing) {
            return false;
        }
        self.door_state = DoorState::Closing;
        self.door_timer = self.timing.door_operation_time;
        true
    }

    // ── Time advancement ───────────────────────────────────────

    /// Advance internal timers by `delta` seconds, then recompute the
    /// travel direction.
    pub fn step(&mut self, delta: SimTime) {
        if self.is_moving {
            self.move_timer -= delta;
            if self.move_timer <= 0.0 {
                self.arrive();
            }
        } else {
            self.step_doors(delta);
        }
        if !self.is_moving {
            self.update_direction();
        }
    }

    fn arrive(&mut self) {
        self.current_floor = self.target_floor.take().unwrap_or(self.current_floor);
        self.is_moving = false;
        self.move_timer = 0.0;
        log::debug!("elevator {} arrived at floor {}", self.id, self.current_floor);
        if self.should_stop_at_current_floor() {
            self.begin_opening();
        }
    }

    fn step_doors(&mut self, delta: SimTime) {
        match self.door_state {
            DoorState::Opening => {
                self.door_timer -= delta;
                if self.door_timer <= 0.0 {
                    self.door_state = DoorState::Open;
                    self.door_timer = 0.0;
                    self.hold_timer = self.timing.door_hold_time;
                }
            }
            DoorState::Closing => {
                self.door_timer -= delta;
                if self.door_timer <= 0.0 {
                    self.door_state = DoorState::Closed;
                    self.door_timer = 0.0;
                }
            }
            DoorState::Open => {
                // Doors never stay open indefinitely.
                self.hold_timer -= delta;
                if self.hold_timer <= 0.0 {
                    self.begin_closing();
                }
            }
            DoorState::Closed => {
                // Standing on a requested floor with closed doors:
                // serve it without needing a MOVE first.
                if self.should_stop_at_current_floor() {
                    self.begin_opening();
                }
            }
        }
    }

    /// Keep going while there is work ahead; only reverse or go idle
    /// when the current direction is exhausted.
    fn update_direction(&mut self) {
        let requests = self.requested_floors();
        if requests.is_empty() {
            self.direction = Direction::Idle;
            return;
        }
        let above = requests.iter().any(|f| f > self.current_floor);
        let below = requests.iter().any(|f| f < self.current_floor);
        self.direction = match self.direction {
            Direction::Up if above => Direction::Up,
            Direction::Down if below => Direction::Down,
            _ => {
                // Current direction exhausted (or idle): head for the
                // closest request, lowest floor on ties.
                let closest = requests
                    .iter()
                    .min_by_key(|&f| f.abs_diff(self.current_floor));
                match closest {
                    Some(target) if target > self.current_floor => Direction::Up,
                    Some(target) if target < self.current_floor => Direction::Down,
                    _ => Direction::Idle,
                }
            }
        };
    }

    /// The next floor this elevator intends to serve. Moving up: the
    /// nearest request strictly above; moving down: strictly below;
    /// idle: the closest by absolute distance, lowest floor on ties.
    pub fn next_target_floor(&self) -> Option<Floor> {
        let requests = self.requested_floors();
        match self.direction {
            Direction::Up => requests.iter().find(|&f| f > self.current_floor),
            Direction::Down => requests
                .iter()
                .filter(|&f| f < self.current_floor)
                .max(),
            Direction::Idle => requests
                .iter()
                .min_by_key(|&f| f.abs_diff(self.current_floor)),
        }
    }

    // ── Requests ───────────────────────────────────────────────

    /// Register a pickup call. Out-of-range floors are ignored.
    pub fn add_pickup_request(&mut self, floor: Floor) {
        if floor < self.floor_count {
            self.pickup_floors.insert(floor);
        }
    }

    /// Register a dropoff target. Out-of-range floors are ignored.
    pub fn add_dropoff_request(&mut self, floor: Floor) {
        if floor < self.floor_count {
            self.dropoff_floors.insert(floor);
        }
    }

    // ── Passenger transfer ─────────────────────────────────────

    /// Board waiting passengers whose start floor matches the current
    /// floor, up to remaining capacity. Boarded passengers are removed
    /// from `waiting`, stamped with a pickup time, and their
    /// destinations registered as dropoffs. No-op unless doors are
    /// fully open.
    pub fn board_passengers(
        &mut self,
        waiting: &mut Vec<Passenger>,
        now: SimTime,
    ) -> Vec<PassengerId> {
        if self.door_state != DoorState::Open || self.passengers.len() >= self.capacity {
            return Vec::new();
        }
        let mut boarded = Vec::new();
        let mut i = 0;
        while i < waiting.len() && self.passengers.len() < self.capacity {
            if waiting[i].start_floor == self.current_floor {
                let mut passenger = waiting.remove(i);
                passenger.board(now);
                self.add_dropoff_request(passenger.destination_floor);
                boarded.push(passenger.id);
                self.passengers.push(passenger);
            } else {
                i += 1;
            }
        }
        if !boarded.is_empty() {
            self.pickup_floors.remove(self.current_floor);
            log::debug!(
                "elevator {} boarded {} at floor {}",
                self.id,
                boarded.len(),
                self.current_floor
            );
        }
        boarded
    }

    /// Let out every onboard passenger destined for the current floor,
    /// stamping dropoff times. Returns the completed passengers.
    /// No-op unless doors are fully open.
    pub fn disembark_passengers(&mut self, now: SimTime) -> Vec<Passenger> {
        if self.door_state != DoorState::Open {
            return Vec::new();
        }
        let mut delivered = Vec::new();
        let mut i = 0;
        while i < self.passengers.len() {
            if self.passengers[i].destination_floor == self.current_floor {
                let mut passenger = self.passengers.remove(i);
                passenger.complete(now);
                delivered.push(passenger);
            } else {
                i += 1;
            }
        }
        if !delivered.is_empty() {
            self.dropoff_floors.remove(self.current_floor);
            log::debug!(
                "elevator {} delivered {} at floor {}",
                self.id,
                delivered.len(),
                self.current_floor
            );
        }
        delivered
    }
}
