use liftsim_core::command::CommandAction;
use liftsim_core::config::{ConfigPatch, SimConfig};
use liftsim_core::dispatch::AlgorithmRegistry;
use liftsim_core::elevator::{Elevator, ElevatorTiming};
use liftsim_core::engine::SimEngine;
use liftsim_core::event::SimEvent;
use liftsim_core::passenger::Passenger;
use liftsim_core::snapshot::SimStatus;

fn small_config(seed: i64) -> SimConfig {
    SimConfig {
        floors: 5,
        elevator_count: 1,
        spawn_rate: 30.0,
        seed,
        ..SimConfig::default()
    }
}

#[test]
fn passengers_get_served_end_to_end() {
    let mut engine = SimEngine::new(small_config(42)).expect("valid config");
    engine.run_ticks(3000, 0.1); // 300 simulated seconds

    let metrics = engine.metrics();
    assert!(metrics.passengers_served > 0, "nobody was delivered");

    for p in engine.completed() {
        let pickup = p.pickup_time.expect("completed passenger has pickup");
        let dropoff = p.dropoff_time.expect("completed passenger has dropoff");
        assert!(pickup >= p.request_time);
        assert!(dropoff >= pickup);
    }
    for state in engine.elevator_states() {
        assert!(state.current_floor < 5);
        assert!(state.passengers.len() <= state.capacity);
    }
}

/// Draining hands over the accumulated events and empties the log, so
/// a long run can flush periodically instead of growing forever.
#[test]
fn drained_events_empty_the_log_and_keep_accumulating() {
    let mut engine = SimEngine::new(small_config(11)).expect("valid config");
    engine.run_ticks(500, 0.1);

    let drained = engine.drain_events();
    assert!(!drained.is_empty());
    assert!(engine.events().is_empty());

    // Subsequent ticks start a fresh log rather than replaying.
    engine.run_ticks(10, 0.1);
    let fresh = engine.events();
    assert!(!fresh.is_empty());
    assert!(fresh.len() < drained.len());
}

/// Every spawned passenger is in exactly one pool: waiting, onboard,
/// or completed.
#[test]
fn passenger_pools_conserve() {
    let mut engine = SimEngine::new(small_config(7)).expect("valid config");
    engine.run_ticks(2000, 0.1);

    let requested = engine
        .events()
        .iter()
        .filter(|e| matches!(e, SimEvent::PassengerRequested { .. }))
        .count();
    let metrics = engine.metrics();
    assert_eq!(requested, metrics.total_passengers);
    assert_eq!(
        metrics.total_passengers,
        engine.completed().len() + engine.waiting().len() + engine.onboard_count()
    );
}

#[test]
fn reset_returns_to_baseline() {
    let mut engine = SimEngine::new(small_config(3)).expect("valid config");
    engine.run_ticks(500, 0.1);
    assert!(engine.sim_time() > 0.0);

    engine.reset();
    assert_eq!(engine.status(), SimStatus::Idle);
    assert_eq!(engine.sim_time(), 0.0);
    assert!(engine.waiting().is_empty());
    assert!(engine.completed().is_empty());
    assert!(engine.events().is_empty());
    for state in engine.elevator_states() {
        assert_eq!(state.current_floor, 0);
        assert!(state.passengers.is_empty());
    }
}

#[test]
fn invalid_configurations_are_rejected_before_start() {
    let cases = [
        SimConfig { floors: 2, ..SimConfig::default() },
        SimConfig { floors: 61, ..SimConfig::default() },
        SimConfig { elevator_count: 0, ..SimConfig::default() },
        SimConfig { elevator_count: 9, ..SimConfig::default() },
        SimConfig { spawn_rate: -5.0, ..SimConfig::default() },
    ];
    for config in cases {
        assert!(SimEngine::new(config.clone()).is_err(), "accepted {config:?}");
    }
}

#[test]
fn spawn_rate_patch_applies_live_without_reset() {
    let mut engine = SimEngine::new(small_config(9)).expect("valid config");
    engine.run_ticks(100, 0.1);
    let time_before = engine.sim_time();

    let patch = ConfigPatch { spawn_rate: Some(0.0), ..ConfigPatch::default() };
    let needs_reset = engine.update_config(&patch).expect("valid patch");
    assert!(!needs_reset);
    assert_eq!(engine.sim_time(), time_before);
    assert_eq!(engine.config().spawn_rate, 0.0);
}

#[test]
fn topology_patch_forces_a_full_reset() {
    let mut engine = SimEngine::new(small_config(9)).expect("valid config");
    engine.run_ticks(100, 0.1);

    let patch = ConfigPatch { floors: Some(12), ..ConfigPatch::default() };
    let needs_reset = engine.update_config(&patch).expect("valid patch");
    assert!(needs_reset);
    assert_eq!(engine.sim_time(), 0.0);
    assert!(engine.waiting().is_empty());
    assert_eq!(engine.config().floors, 12);
}

#[test]
fn invalid_patch_leaves_config_untouched() {
    let mut engine = SimEngine::new(small_config(9)).expect("valid config");
    let patch = ConfigPatch { floors: Some(99), ..ConfigPatch::default() };
    assert!(engine.update_config(&patch).is_err());
    assert_eq!(engine.config().floors, 5);
}

#[test]
fn algorithm_swap_is_rejected_mid_run() {
    let registry = AlgorithmRegistry::with_builtins();
    let mut engine = SimEngine::new(small_config(1)).expect("valid config");

    engine.set_status(SimStatus::Running);
    assert!(engine.set_algorithm(registry.create("greedy").unwrap()).is_err());

    engine.set_status(SimStatus::Idle);
    engine
        .set_algorithm(registry.create("greedy").unwrap())
        .expect("swap while idle");
    assert_eq!(engine.algorithm_name(), "greedy");
}

/// The waiting pool is processed sequentially: once the first
/// elevator boards the only matching passenger, the second sees an
/// already-updated pool.
#[test]
fn boarding_drains_the_shared_pool_in_order() {
    let timing = ElevatorTiming::default();
    let mut first = Elevator::new(0, 10, 3, 8, timing);
    let mut second = Elevator::new(1, 10, 3, 8, timing);
    for elevator in [&mut first, &mut second] {
        assert!(elevator.execute_command(CommandAction::OpenDoors));
        elevator.step(1.5);
    }

    let mut pool = vec![Passenger::new(1, 3, 7, 0.0)];
    assert_eq!(first.board_passengers(&mut pool, 1.0).len(), 1);
    assert!(second.board_passengers(&mut pool, 1.0).is_empty());
    assert!(pool.is_empty());
}
