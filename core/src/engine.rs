//! The simulation orchestrator.
//!
//! PER-TICK ORDER (fixed, never reordered):
//!   1. Spawner generates new arrivals; they join the waiting pool
//!      immediately, so dispatch sees them the same tick.
//!   2. The dispatch algorithm is consulted with pre-step snapshots
//!      and the waiting pool.
//!   3. Each elevator, in index order: step, apply its command, board
//!      against the live waiting pool, disembark. Elevator N+1 sees
//!      the pool after N's removals.
//!
//! The engine is the sole owner of the elevators and both passenger
//! pools; everything is mutated from inside handle_tick, so the whole
//! model is single-threaded and lock-free.

use crate::{
    config::{ConfigPatch, SimConfig},
    dispatch::{dedup_commands, DispatchAlgorithm, GreedyDispatch},
    elevator::{DoorState, Elevator, ElevatorState},
    error::{SimError, SimResult},
    event::SimEvent,
    metrics::SimMetrics,
    passenger::Passenger,
    snapshot::{SimSnapshot, SimStatus},
    spawner::PassengerSpawner,
    types::SimTime,
};

pub struct SimEngine {
    config: SimConfig,
    status: SimStatus,
    elevators: Vec<Elevator>,
    spawner: PassengerSpawner,
    algorithm: Box<dyn DispatchAlgorithm>,
    /// Kept in request order; the greedy tie-break depends on it.
    waiting: Vec<Passenger>,
    completed: Vec<Passenger>,
    sim_time: SimTime,
    events: Vec<SimEvent>,
}

impl SimEngine {
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let mut engine = Self {
            elevators: Vec::new(),
            spawner: PassengerSpawner::new(config.seed, config.floors, config.spawn_rate),
            algorithm: Box::new(GreedyDispatch::new()),
            waiting: Vec::new(),
            completed: Vec::new(),
            sim_time: 0.0,
            events: Vec::new(),
            status: SimStatus::Idle,
            config,
        };
        engine.rebuild();
        Ok(engine)
    }

    /// Tear down all run state and rebuild from the current config.
    /// The only cancellation primitive; there is no partial reset.
    pub fn reset(&mut self) {
        self.rebuild();
        self.waiting.clear();
        self.completed.clear();
        self.events.clear();
        self.sim_time = 0.0;
        self.status = SimStatus::Idle;
    }

    fn rebuild(&mut self) {
        self.elevators = (0..self.config.elevator_count)
            .map(|id| {
                Elevator::new(id, self.config.floors, 0, self.config.capacity, self.config.timing)
            })
            .collect();
        let mut spawner =
            PassengerSpawner::new(self.config.seed, self.config.floors, self.config.spawn_rate);
        spawner.set_max_waiting_per_floor(self.config.max_waiting_per_floor);
        self.spawner = spawner;
    }

    // ── Control surface ────────────────────────────────────────

    pub fn status(&self) -> SimStatus {
        self.status
    }

    pub fn set_status(&mut self, status: SimStatus) {
        self.status = status;
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Apply a partial config update. Returns whether the change
    /// forced a full reset (topology changes do; a spawn-rate change
    /// applies live; a new seed takes effect at the next reset).
    pub fn update_config(&mut self, patch: &ConfigPatch) -> SimResult<bool> {
        let needs_reset = patch.apply(&mut self.config)?;
        if needs_reset {
            self.reset();
        } else if let Some(rate) = patch.spawn_rate {
            self.spawner.set_spawn_rate(rate)?;
        }
        Ok(needs_reset)
    }

    /// Swap the dispatch algorithm. Only permitted between runs.
    pub fn set_algorithm(&mut self, algorithm: Box<dyn DispatchAlgorithm>) -> SimResult<()> {
        if self.status != SimStatus::Idle {
            return Err(SimError::SimulationRunning);
        }
        log::info!("dispatch algorithm set to '{}'", algorithm.name());
        self.algorithm = algorithm;
        Ok(())
    }

    pub fn algorithm_name(&self) -> &'static str {
        self.algorithm.name()
    }

    // ── Tick processing ────────────────────────────────────────

    /// Advance the whole simulation by one tick.
    pub fn handle_tick(&mut self, delta: SimTime) {
        self.sim_time += delta;
        let now = self.sim_time;

        // 1. New arrivals, visible to dispatch this same tick.
        let counts = self.per_floor_waiting_counts();
        let arrivals = self.spawner.next_tick(delta, now, &counts);
        for passenger in &arrivals {
            self.events.push(SimEvent::PassengerRequested {
                id: passenger.id,
                floor: passenger.start_floor,
                destination: passenger.destination_floor,
                time: now,
            });
        }
        self.waiting.extend(arrivals);

        // 2. Dispatch, from pre-step snapshots.
        let snapshots: Vec<ElevatorState> = self.elevators.iter().map(|e| e.state()).collect();
        let commands =
            dedup_commands(self.algorithm.on_tick(&snapshots, &self.waiting, now));

        // 3. Per elevator, in fixed index order.
        for index in 0..self.elevators.len() {
            let before_floor = self.elevators[index].current_floor();
            let before_doors = self.elevators[index].door_state();

            self.elevators[index].step(delta);

            if let Some(command) = commands.get(&index) {
                let accepted = self.elevators[index].execute_command(command.action);
                if !accepted {
                    log::debug!(
                        "elevator {index} rejected {:?} at t={now:.1}",
                        command.action
                    );
                }
            }

            let boarded = self.elevators[index].board_passengers(&mut self.waiting, now);
            let floor = self.elevators[index].current_floor();
            for id in boarded {
                self.events.push(SimEvent::PassengerPickedUp {
                    id,
                    elevator_id: index,
                    floor,
                    time: now,
                });
            }

            let delivered = self.elevators[index].disembark_passengers(now);
            for passenger in &delivered {
                self.events.push(SimEvent::PassengerDelivered {
                    id: passenger.id,
                    elevator_id: index,
                    floor,
                    time: now,
                });
            }
            self.completed.extend(delivered);

            self.record_transitions(index, before_floor, before_doors, now);
        }

        self.events.push(SimEvent::TickCompleted {
            time: now,
            waiting: self.waiting.len(),
            onboard: self.onboard_count(),
            served: self.completed.len(),
        });
    }

    /// Convenience fixed-step driver for headless runs and tests.
    pub fn run_ticks(&mut self, ticks: u64, delta: SimTime) {
        for _ in 0..ticks {
            self.handle_tick(delta);
        }
    }

    fn record_transitions(
        &mut self,
        index: usize,
        before_floor: usize,
        before_doors: DoorState,
        now: SimTime,
    ) {
        let elevator = &self.elevators[index];
        let floor = elevator.current_floor();
        if floor != before_floor {
            self.events.push(SimEvent::ElevatorArrived { elevator_id: index, floor, time: now });
        }
        let doors = elevator.door_state();
        if doors != before_doors {
            match doors {
                DoorState::Open => {
                    self.events.push(SimEvent::DoorsOpened { elevator_id: index, floor, time: now })
                }
                DoorState::Closed => {
                    self.events.push(SimEvent::DoorsClosed { elevator_id: index, floor, time: now })
                }
                _ => {}
            }
        }
    }

    // ── Read surface ───────────────────────────────────────────

    pub fn sim_time(&self) -> SimTime {
        self.sim_time
    }

    pub fn waiting(&self) -> &[Passenger] {
        &self.waiting
    }

    pub fn completed(&self) -> &[Passenger] {
        &self.completed
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Take ownership of the accumulated events, leaving the log
    /// empty. The log is otherwise retained for the whole run, so
    /// long interactive sessions should drain it periodically.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn elevator_states(&self) -> Vec<ElevatorState> {
        self.elevators.iter().map(|e| e.state()).collect()
    }

    pub fn onboard_count(&self) -> usize {
        self.elevators.iter().map(|e| e.passenger_count()).sum()
    }

    pub fn metrics(&self) -> SimMetrics {
        SimMetrics::compute(&self.completed, self.waiting.len(), self.onboard_count())
    }

    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            status: self.status,
            time: self.sim_time,
            elevators: self.elevator_states(),
            waiting: self.waiting.clone(),
            metrics: self.metrics(),
        }
    }

    fn per_floor_waiting_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.config.floors];
        for passenger in &self.waiting {
            if let Some(slot) = counts.get_mut(passenger.start_floor) {
                *slot += 1;
            }
        }
        counts
    }
}
