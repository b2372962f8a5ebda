//! sim-runner: headless elevator simulation runner.
//!
//! Usage:
//!   sim-runner --seed 42 --ticks 6000 --floors 10 --elevators 2 --rate 6
//!   sim-runner --seed 42 --ticks 6000 --json

use anyhow::Result;
use liftsim_core::{
    config::{SimConfig, BASE_TICK_RATE},
    sim::Simulation,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42i64);
    let ticks = parse_arg(&args, "--ticks", 6000u64);
    let floors = parse_arg(&args, "--floors", 10usize);
    let elevators = parse_arg(&args, "--elevators", 2usize);
    let rate = parse_arg(&args, "--rate", 6.0f64);
    let json = args.iter().any(|a| a == "--json");

    let config = SimConfig {
        floors,
        elevator_count: elevators,
        spawn_rate: rate,
        seed,
        ..SimConfig::default()
    };

    let mut sim = Simulation::new(config)?;
    sim.run_ticks(ticks);
    log::info!("run complete at t={:.1}s", sim.snapshot().time);

    let snapshot = sim.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let sim_seconds = ticks as f64 / BASE_TICK_RATE;
    println!("liftsim sim-runner");
    println!("  seed:       {seed}");
    println!("  floors:     {floors}");
    println!("  elevators:  {elevators}");
    println!("  rate:       {rate} passengers/min");
    println!("  simulated:  {sim_seconds:.0}s over {ticks} ticks");
    println!();
    let m = snapshot.metrics;
    println!("  served:     {}", m.passengers_served);
    println!("  total:      {}", m.total_passengers);
    println!("  waiting:    {}", snapshot.waiting.len());
    println!("  avg wait:   {:.2}s", m.avg_wait_time);
    println!("  avg travel: {:.2}s", m.avg_travel_time);
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
