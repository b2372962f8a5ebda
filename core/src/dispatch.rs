//! The dispatch algorithm boundary and the greedy reference policy.
//!
//! RULE: Algorithms see only immutable elevator snapshots and the
//! waiting pool. They never touch elevator internals; every effect
//! goes through the per-tick command list, at most one command per
//! elevator.

use crate::command::{CommandAction, DispatchCommand};
use crate::elevator::{Direction, DoorState, ElevatorState};
use crate::error::{SimError, SimResult};
use crate::passenger::Passenger;
use crate::types::{Floor, PassengerId, SimTime};
use std::collections::HashMap;

/// The contract every dispatch strategy must fulfill.
pub trait DispatchAlgorithm: Send {
    /// Unique stable name, used for registry lookup.
    fn name(&self) -> &'static str;

    /// Called once per tick with fresh elevator snapshots and the
    /// current waiting pool. Returns at most one command per elevator.
    fn on_tick(
        &mut self,
        elevators: &[ElevatorState],
        waiting: &[Passenger],
        now: SimTime,
    ) -> Vec<DispatchCommand>;
}

/// The nearest-call reference policy. Elevators are evaluated one by
/// one, in snapshot order:
///   1. open doors get closed proactively,
///   2. a loaded car heads for its closest onboard destination,
///   3. an idle car heads for the closest waiting call not already
///      claimed by an earlier elevator this tick,
///   4. otherwise no command.
///
/// Claims last one tick only; there is no persistent call
/// partitioning across ticks. Equidistant waiting calls tie-break to
/// the first in waiting-pool order; the orchestrator keeps that pool
/// in request order, so the earliest request wins.
#[derive(Debug, Default)]
pub struct GreedyDispatch;

impl GreedyDispatch {
    pub fn new() -> Self {
        Self
    }

    fn command_for(
        elevator: &ElevatorState,
        waiting: &[Passenger],
        claimed: &mut Vec<PassengerId>,
    ) -> Option<CommandAction> {
        if elevator.door_state == DoorState::Open {
            return Some(CommandAction::CloseDoors);
        }
        if !elevator.passengers.is_empty() {
            let target = Self::closest_destination(elevator)?;
            return Some(Self::move_toward(elevator.current_floor, target));
        }
        if elevator.direction == Direction::Idle {
            let call = Self::closest_call(elevator.current_floor, waiting, claimed)?;
            claimed.push(call.id);
            return Some(Self::move_toward(elevator.current_floor, call.start_floor));
        }
        None
    }

    /// The onboard destination numerically closest to the current
    /// floor. Ties go to the passenger boarded first.
    fn closest_destination(elevator: &ElevatorState) -> Option<Floor> {
        elevator
            .passengers
            .iter()
            .map(|p| p.destination_floor)
            .min_by_key(|&f| f.abs_diff(elevator.current_floor))
    }

    /// The unclaimed waiting passenger closest by absolute floor
    /// distance, scanned in pool order so only a strictly smaller
    /// distance displaces the current pick.
    fn closest_call<'a>(
        from: Floor,
        waiting: &'a [Passenger],
        claimed: &[PassengerId],
    ) -> Option<&'a Passenger> {
        waiting
            .iter()
            .filter(|p| !claimed.contains(&p.id))
            .min_by_key(|p| p.start_floor.abs_diff(from))
    }

    fn move_toward(current: Floor, target: Floor) -> CommandAction {
        match target.cmp(&current) {
            std::cmp::Ordering::Equal => CommandAction::OpenDoors,
            std::cmp::Ordering::Greater => CommandAction::MoveUp,
            std::cmp::Ordering::Less => CommandAction::MoveDown,
        }
    }
}

impl DispatchAlgorithm for GreedyDispatch {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn on_tick(
        &mut self,
        elevators: &[ElevatorState],
        waiting: &[Passenger],
        _now: SimTime,
    ) -> Vec<DispatchCommand> {
        let mut claimed = Vec::new();
        let mut commands = Vec::new();
        for elevator in elevators {
            if let Some(action) = Self::command_for(elevator, waiting, &mut claimed) {
                commands.push(DispatchCommand::new(elevator.id, action));
            }
        }
        commands
    }
}

type AlgorithmFactory = Box<dyn Fn() -> Box<dyn DispatchAlgorithm>>;

/// Named algorithm factories. Algorithms are swapped between runs,
/// never mid-run; the engine enforces that.
pub struct AlgorithmRegistry {
    factories: Vec<(&'static str, AlgorithmFactory)>,
}

impl AlgorithmRegistry {
    /// An empty registry. Most callers want [`with_builtins`].
    ///
    /// [`with_builtins`]: AlgorithmRegistry::with_builtins
    pub fn new() -> Self {
        Self { factories: Vec::new() }
    }

    /// A registry preloaded with the bundled policies.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("greedy", || Box::new(GreedyDispatch::new()));
        registry
    }

    pub fn register<F>(&mut self, name: &'static str, factory: F)
    where
        F: Fn() -> Box<dyn DispatchAlgorithm> + 'static,
    {
        self.factories.retain(|(n, _)| *n != name);
        self.factories.push((name, Box::new(factory)));
    }

    pub fn create(&self, name: &str) -> SimResult<Box<dyn DispatchAlgorithm>> {
        self.factories
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, factory)| factory())
            .ok_or_else(|| SimError::AlgorithmNotFound { name: name.to_string() })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.factories.iter().map(|(n, _)| *n).collect()
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Keep at most the first command per elevator, warning about
/// algorithms that emit duplicates.
pub fn dedup_commands(commands: Vec<DispatchCommand>) -> HashMap<usize, DispatchCommand> {
    let mut by_elevator = HashMap::new();
    for command in commands {
        if by_elevator.contains_key(&command.elevator_id) {
            log::warn!(
                "dispatch emitted multiple commands for elevator {}; keeping the first",
                command.elevator_id
            );
            continue;
        }
        by_elevator.insert(command.elevator_id, command);
    }
    by_elevator
}
