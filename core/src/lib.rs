//! liftsim-core: a deterministic multi-elevator building simulation.
//!
//! Passengers arrive at floors and request travel; a pluggable
//! dispatch algorithm issues per-tick commands to each elevator;
//! elevator state machines execute movement, door cycles, and
//! passenger transfer; wait/travel metrics fall out of the completed
//! pool.
//!
//! Everything runs on one logical thread: the scheduler delivers
//! ticks strictly sequentially, and all state is mutated only from
//! inside a tick handler. Same seed, same config ⇒ byte-identical
//! event logs.

pub mod command;
pub mod config;
pub mod dispatch;
pub mod elevator;
pub mod engine;
pub mod error;
pub mod event;
pub mod metrics;
pub mod passenger;
pub mod rng;
pub mod scheduler;
pub mod sim;
pub mod snapshot;
pub mod spawner;
pub mod types;
