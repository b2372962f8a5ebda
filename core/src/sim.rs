//! The control facade the UI layer talks to: a tick scheduler wired
//! to a shared engine, plus start/pause/resume/reset, speed control,
//! and partial reconfiguration.
//!
//! Single-threaded by design: the engine lives in an Rc<RefCell<_>>
//! and is only ever borrowed from inside a tick callback or a control
//! call, never concurrently.

use crate::{
    config::{ConfigPatch, SimConfig, BASE_TICK_RATE, MAX_SPEED, MIN_SPEED},
    dispatch::DispatchAlgorithm,
    engine::SimEngine,
    error::{SimError, SimResult},
    metrics::SimMetrics,
    scheduler::TickScheduler,
    snapshot::{SimSnapshot, SimStatus},
};
use std::cell::RefCell;
use std::rc::Rc;

pub struct Simulation {
    engine: Rc<RefCell<SimEngine>>,
    scheduler: TickScheduler,
    speed: f64,
}

impl Simulation {
    pub fn new(config: SimConfig) -> SimResult<Self> {
        let engine = Rc::new(RefCell::new(SimEngine::new(config)?));
        let mut scheduler = TickScheduler::new(BASE_TICK_RATE);
        let tick_target = Rc::clone(&engine);
        scheduler.on_tick(move |info| {
            tick_target.borrow_mut().handle_tick(info.delta);
            Ok(())
        });
        Ok(Self { engine, scheduler, speed: 1.0 })
    }

    // ── Run control ────────────────────────────────────────────

    /// Begin a fresh run from idle.
    pub fn start(&mut self) {
        if self.status() != SimStatus::Idle {
            return;
        }
        self.scheduler.start();
        self.engine.borrow_mut().set_status(SimStatus::Running);
    }

    pub fn pause(&mut self) {
        if self.status() == SimStatus::Running {
            self.scheduler.pause();
            self.engine.borrow_mut().set_status(SimStatus::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.status() == SimStatus::Paused {
            self.scheduler.resume();
            self.engine.borrow_mut().set_status(SimStatus::Running);
        }
    }

    /// Stop the scheduler and discard all run state.
    pub fn reset(&mut self) {
        self.scheduler.stop();
        self.engine.borrow_mut().reset();
    }

    /// Scale the tick rate against the fixed base rate. The multiplier
    /// must lie in [0.25, 4.0].
    pub fn set_speed(&mut self, multiplier: f64) -> SimResult<()> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&multiplier) {
            return Err(SimError::InvalidSpeed {
                got: multiplier,
                min: MIN_SPEED,
                max: MAX_SPEED,
            });
        }
        self.speed = multiplier;
        self.scheduler.set_tick_rate(BASE_TICK_RATE * multiplier)
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Apply a partial config change. Topology changes stop the run
    /// and reset; a spawn-rate change applies live.
    pub fn update_config(&mut self, patch: &ConfigPatch) -> SimResult<()> {
        let needs_reset = self.engine.borrow_mut().update_config(patch)?;
        if needs_reset {
            self.scheduler.stop();
        }
        Ok(())
    }

    pub fn set_algorithm(&mut self, algorithm: Box<dyn DispatchAlgorithm>) -> SimResult<()> {
        self.engine.borrow_mut().set_algorithm(algorithm)
    }

    // ── Drivers ────────────────────────────────────────────────

    /// Deliver a tick if one is due by wall time. Call from the host
    /// loop. Returns true if a tick fired.
    pub fn pump(&mut self) -> bool {
        self.scheduler.pump()
    }

    /// Fixed-step driver: run `ticks` ticks at the nominal interval
    /// for the current rate, starting the run if needed.
    pub fn run_ticks(&mut self, ticks: u64) {
        self.start();
        let delta = 1.0 / self.scheduler.tick_rate();
        for _ in 0..ticks {
            self.scheduler.fire(delta);
        }
    }

    // ── Read surface ───────────────────────────────────────────

    pub fn status(&self) -> SimStatus {
        self.engine.borrow().status()
    }

    pub fn snapshot(&self) -> SimSnapshot {
        self.engine.borrow().snapshot()
    }

    pub fn metrics(&self) -> SimMetrics {
        self.engine.borrow().metrics()
    }

    pub fn config(&self) -> SimConfig {
        self.engine.borrow().config().clone()
    }

    /// Shared handle to the engine, for callers that need the full
    /// read surface (event log, pools).
    pub fn engine(&self) -> Rc<RefCell<SimEngine>> {
        Rc::clone(&self.engine)
    }
}
