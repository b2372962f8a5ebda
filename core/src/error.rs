use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Floor count {got} out of range [{min}, {max}]")]
    FloorCountOutOfRange { got: usize, min: usize, max: usize },

    #[error("Elevator count {got} out of range [{min}, {max}]")]
    ElevatorCountOutOfRange { got: usize, min: usize, max: usize },

    #[error("Spawn rate {got} must be >= 0 passengers/minute")]
    InvalidSpawnRate { got: f64 },

    #[error("Speed multiplier {got} out of range [{min}, {max}]")]
    InvalidSpeed { got: f64, min: f64, max: f64 },

    #[error("Tick rate {got} must be > 0 ticks/second")]
    InvalidTickRate { got: f64 },

    #[error("Dispatch algorithm '{name}' not registered")]
    AlgorithmNotFound { name: String },

    #[error("Operation not permitted while the simulation is running")]
    SimulationRunning,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
