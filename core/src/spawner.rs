//! Passenger arrival process.
//!
//! Arrivals follow a Poisson process at the configured rate
//! (passengers/minute), evaluated against each tick's duration. Start
//! floors come from the active spawn pattern; destinations respect
//! the building's boundary rules (nowhere to go but up from the
//! ground floor, nowhere but down from the top).

use crate::error::{SimError, SimResult};
use crate::passenger::Passenger;
use crate::rng::SimRng;
use crate::types::{Floor, PassengerId, SimTime};
use serde::{Deserialize, Serialize};

/// Above this expected count per tick, the exact Knuth draw gets
/// numerically pointless and a normal approximation takes over.
const POISSON_APPROX_THRESHOLD: f64 = 10.0;

/// Start-floor selection policy. Uniform is the default; the rush
/// patterns weight traffic the way an office building moves during
/// the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum SpawnPattern {
    /// Every floor equally likely.
    Uniform,
    /// Heavy ground-floor arrivals heading up.
    MorningRush,
    /// Heavy upper-floor arrivals heading down.
    EveningRush,
    /// Traffic concentrated around the middle floors.
    LunchRush,
    /// Explicit per-floor weights. Must cover every floor; weights
    /// are relative, not normalized.
    Custom { weights: Vec<f64> },
}

impl SpawnPattern {
    /// Relative weight of `floor` as a start floor.
    fn weight(&self, floor: Floor, floor_count: usize) -> f64 {
        let top = floor_count - 1;
        match self {
            SpawnPattern::Uniform => 1.0,
            SpawnPattern::MorningRush => {
                if floor == 0 {
                    6.0
                } else {
                    0.5
                }
            }
            SpawnPattern::EveningRush => {
                if floor == 0 {
                    0.5
                } else {
                    1.0 + 2.0 * floor as f64 / top as f64
                }
            }
            SpawnPattern::LunchRush => {
                let mid = top as f64 / 2.0;
                let distance = (floor as f64 - mid).abs();
                (3.0 - distance * 4.0 / top as f64).max(0.5)
            }
            SpawnPattern::Custom { weights } => {
                weights.get(floor).copied().unwrap_or(0.0).max(0.0)
            }
        }
    }
}

pub struct PassengerSpawner {
    rng: SimRng,
    floor_count: usize,
    /// Passengers per minute.
    spawn_rate: f64,
    pattern: SpawnPattern,
    /// Rate-limiting guard: no spawn occurs within this many seconds
    /// of the last one. Zero disables the guard.
    min_spawn_interval: SimTime,
    /// A floor at or above this many waiting passengers receives no
    /// new arrivals.
    max_waiting_per_floor: usize,
    last_spawn_time: Option<SimTime>,
    next_id: PassengerId,
}

impl PassengerSpawner {
    pub fn new(seed: i64, floor_count: usize, spawn_rate: f64) -> Self {
        Self {
            rng: SimRng::new(seed),
            floor_count,
            spawn_rate,
            pattern: SpawnPattern::Uniform,
            min_spawn_interval: 0.0,
            max_waiting_per_floor: usize::MAX,
            last_spawn_time: None,
            next_id: 0,
        }
    }

    pub fn spawn_rate(&self) -> f64 {
        self.spawn_rate
    }

    /// Change the arrival rate at any time. Negative rates are a
    /// caller error; zero legitimately means no arrivals.
    pub fn set_spawn_rate(&mut self, rate: f64) -> SimResult<()> {
        if rate < 0.0 || !rate.is_finite() {
            return Err(SimError::InvalidSpawnRate { got: rate });
        }
        self.spawn_rate = rate;
        Ok(())
    }

    pub fn pattern(&self) -> &SpawnPattern {
        &self.pattern
    }

    pub fn set_pattern(&mut self, pattern: SpawnPattern) {
        self.pattern = pattern;
    }

    pub fn set_min_spawn_interval(&mut self, seconds: SimTime) {
        self.min_spawn_interval = seconds.max(0.0);
    }

    pub fn set_max_waiting_per_floor(&mut self, cap: usize) {
        self.max_waiting_per_floor = cap;
    }

    /// Generate this tick's new arrivals. `per_floor_waiting` holds
    /// the current waiting-pool count per floor, indexed by floor.
    pub fn next_tick(
        &mut self,
        delta: SimTime,
        now: SimTime,
        per_floor_waiting: &[usize],
    ) -> Vec<Passenger> {
        if self.spawn_rate <= 0.0 || delta <= 0.0 {
            return Vec::new();
        }
        if let Some(last) = self.last_spawn_time {
            if now - last < self.min_spawn_interval {
                return Vec::new();
            }
        }

        let lambda = self.spawn_rate * delta / 60.0;
        let count = self.draw_poisson(lambda);
        let mut spawned = Vec::with_capacity(count);
        // Cap checks include passengers spawned earlier in this batch,
        // so a single tick can never push a floor past the cap.
        let mut batch_per_floor = vec![0usize; self.floor_count];
        for _ in 0..count {
            let start = self.pick_start_floor();
            let waiting = per_floor_waiting.get(start).copied().unwrap_or(0)
                + batch_per_floor.get(start).copied().unwrap_or(0);
            if waiting >= self.max_waiting_per_floor {
                // Floor is saturated; drop this arrival.
                continue;
            }
            if let Some(slot) = batch_per_floor.get_mut(start) {
                *slot += 1;
            }
            let destination = self.pick_destination(start);
            let id = self.next_id;
            self.next_id += 1;
            spawned.push(Passenger::new(id, start, destination, now));
        }
        if !spawned.is_empty() {
            self.last_spawn_time = Some(now);
            log::debug!("spawned {} passenger(s) at t={now:.1}", spawned.len());
        }
        spawned
    }

    /// Draw an arrival count for one interval with expectation
    /// `lambda`. Knuth's multiply-uniforms method for small lambda, a
    /// rounded normal approximation for large.
    fn draw_poisson(&mut self, lambda: f64) -> usize {
        if lambda <= 0.0 {
            return 0;
        }
        if lambda < POISSON_APPROX_THRESHOLD {
            let limit = (-lambda).exp();
            let mut product = 1.0;
            let mut count = 0usize;
            loop {
                product *= self.rng.next_f64();
                if product <= limit {
                    return count;
                }
                count += 1;
            }
        }
        let sample = self.rng.gaussian(lambda, lambda.sqrt());
        sample.round().max(0.0) as usize
    }

    fn pick_start_floor(&mut self) -> Floor {
        let total: f64 = (0..self.floor_count)
            .map(|f| self.pattern.weight(f, self.floor_count))
            .sum();
        if total <= 0.0 {
            // Degenerate weights: fall back to uniform.
            return self.rng.next_int_below(self.floor_count as i64) as Floor;
        }
        let mut roll = self.rng.next_f64() * total;
        for floor in 0..self.floor_count {
            roll -= self.pattern.weight(floor, self.floor_count);
            if roll < 0.0 {
                return floor;
            }
        }
        self.floor_count - 1
    }

    /// Pick a destination different from `start`. Ground-floor
    /// passengers can only go up and top-floor passengers only down;
    /// everyone else picks uniformly among the other floors.
    fn pick_destination(&mut self, start: Floor) -> Floor {
        let top = self.floor_count - 1;
        if start == 0 {
            return self.rng.next_int(1, self.floor_count as i64) as Floor;
        }
        if start == top {
            return self.rng.next_int_below(top as i64) as Floor;
        }
        let pick = self.rng.next_int_below(self.floor_count as i64 - 1) as Floor;
        if pick >= start {
            pick + 1
        } else {
            pick
        }
    }
}
