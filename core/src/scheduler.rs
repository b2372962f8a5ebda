//! Tick scheduler: owns tick timing, speed, pause, and callback
//! delivery.
//!
//! RULES:
//!   - Ticks are delivered strictly sequentially. A tick never starts
//!     while a previous tick's callbacks are still executing.
//!   - Callbacks fire in registration order, every tick.
//!   - An error from one callback is logged and must not prevent the
//!     remaining callbacks, or future ticks, from running.
//!   - Delta time comes from measured elapsed wall time, not the
//!     nominal interval, so the simulation stays correct under timer
//!     drift.

use crate::error::{SimError, SimResult};
use crate::types::SimTime;
use std::time::Instant;

/// What every tick callback receives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInfo {
    /// Seconds elapsed since the previous tick.
    pub delta: SimTime,
    /// Total seconds accumulated since start(). Survives pause/resume,
    /// resets on stop + start.
    pub total: SimTime,
}

/// Detachable registration handle returned by [`TickScheduler::on_tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackHandle(u64);

type TickCallback = Box<dyn FnMut(TickInfo) -> SimResult<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchedulerState {
    Idle,
    Running,
    Paused,
}

pub struct TickScheduler {
    callbacks: Vec<(u64, TickCallback)>,
    next_handle: u64,
    state: SchedulerState,
    tick_rate: f64,
    total_time: SimTime,
    last_fire: Option<Instant>,
}

impl TickScheduler {
    pub fn new(tick_rate: f64) -> Self {
        assert!(tick_rate > 0.0, "tick rate must be > 0");
        Self {
            callbacks: Vec::new(),
            next_handle: 0,
            state: SchedulerState::Idle,
            tick_rate,
            total_time: 0.0,
            last_fire: None,
        }
    }

    /// Register a tick callback. Callbacks fire in registration order.
    pub fn on_tick<F>(&mut self, callback: F) -> CallbackHandle
    where
        F: FnMut(TickInfo) -> SimResult<()> + 'static,
    {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.callbacks.push((handle, Box::new(callback)));
        CallbackHandle(handle)
    }

    /// Detach a previously registered callback.
    pub fn remove(&mut self, handle: CallbackHandle) {
        self.callbacks.retain(|(id, _)| *id != handle.0);
    }

    /// Begin delivering ticks from idle. Resets total time.
    pub fn start(&mut self) {
        self.state = SchedulerState::Running;
        self.total_time = 0.0;
        self.last_fire = None;
    }

    /// Halt delivery and return to idle.
    pub fn stop(&mut self) {
        self.state = SchedulerState::Idle;
        self.last_fire = None;
    }

    /// Suspend delivery. Total time is preserved. A running tick is
    /// never preempted; pause takes effect between ticks.
    pub fn pause(&mut self) {
        if self.state == SchedulerState::Running {
            self.state = SchedulerState::Paused;
        }
    }

    /// Continue from paused. The pause gap does not count as elapsed
    /// time.
    pub fn resume(&mut self) {
        if self.state == SchedulerState::Paused {
            self.state = SchedulerState::Running;
            self.last_fire = None;
        }
    }

    /// Change the target rate. Takes effect on the next scheduled
    /// tick.
    pub fn set_tick_rate(&mut self, ticks_per_second: f64) -> SimResult<()> {
        if ticks_per_second <= 0.0 {
            return Err(SimError::InvalidTickRate { got: ticks_per_second });
        }
        self.tick_rate = ticks_per_second;
        Ok(())
    }

    pub fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == SchedulerState::Paused
    }

    pub fn total_time(&self) -> SimTime {
        self.total_time
    }

    /// Deliver at most one tick if the interval has elapsed since the
    /// last delivery, using measured wall time as the delta. Returns
    /// true if a tick fired. Callers drive this from their own loop.
    pub fn pump(&mut self) -> bool {
        if self.state != SchedulerState::Running {
            return false;
        }
        let now = Instant::now();
        let Some(prev) = self.last_fire else {
            // First pump after start/resume: establish the baseline.
            self.last_fire = Some(now);
            return false;
        };
        let elapsed = now.duration_since(prev).as_secs_f64();
        if elapsed < 1.0 / self.tick_rate {
            return false;
        }
        self.last_fire = Some(now);
        self.fire(elapsed);
        true
    }

    /// Deliver one tick with an explicit delta. Used by fixed-step
    /// drivers and tests; no-op unless running.
    pub fn fire(&mut self, delta: SimTime) -> bool {
        if self.state != SchedulerState::Running {
            return false;
        }
        self.total_time += delta;
        let info = TickInfo { delta, total: self.total_time };
        for (id, callback) in &mut self.callbacks {
            if let Err(err) = callback(info) {
                // Contain the failure: remaining callbacks and future
                // ticks still run.
                log::error!("tick callback {id} failed: {err}");
            }
        }
        true
    }
}
