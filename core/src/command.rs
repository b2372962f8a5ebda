use crate::types::ElevatorId;
use serde::{Deserialize, Serialize};

/// Everything a dispatch algorithm may ask an elevator to do.
/// One floor of movement or one door transition per command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    MoveUp,
    MoveDown,
    OpenDoors,
    CloseDoors,
    Wait,
}

/// A command addressed to exactly one elevator. Produced fresh each
/// tick by the active dispatch algorithm, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchCommand {
    pub elevator_id: ElevatorId,
    pub action: CommandAction,
}

impl DispatchCommand {
    pub fn new(elevator_id: ElevatorId, action: CommandAction) -> Self {
        Self { elevator_id, action }
    }
}
