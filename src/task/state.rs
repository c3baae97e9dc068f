// ABOUTME: Task lifecycle state machine with enforced transitions
// ABOUTME: Defines the Waiting -> Running -> Complete progression for task nodes

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Waiting,
    Running,
    Complete,
}

impl TaskState {
    /// Check whether a transition to `next` is legal. Transitions are strictly
    /// monotonic: Waiting -> Running -> Complete, with Complete terminal.
    pub fn can_transition_to(self, next: TaskState) -> bool {
        matches!(
            (self, next),
            (TaskState::Waiting, TaskState::Running) | (TaskState::Running, TaskState::Complete)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == TaskState::Complete
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskState::Waiting => write!(f, "waiting"),
            TaskState::Running => write!(f, "running"),
            TaskState::Complete => write!(f, "complete"),
        }
    }
}
