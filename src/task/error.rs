// ABOUTME: Error types for task state and result stream operations
// ABOUTME: Defines failures surfaced by task nodes and running task units

use thiserror::Error;

use super::params::BindError;
use super::state::TaskState;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Invalid state transition for task '{task}': {from} -> {to}")]
    InvalidState {
        task: String,
        from: TaskState,
        to: TaskState,
    },

    #[error("Result stream for task '{task}' is closed")]
    StreamClosed { task: String },

    #[error("Task '{task}' has no parent to receive results")]
    NoParent { task: String },

    #[error("Task '{task}' was started without its stream endpoints")]
    NotWired { task: String },

    #[error("Parameter binding error: {0}")]
    Bind(#[from] BindError),

    #[error("Task execution failed: {task} - {message}")]
    Failed { task: String, message: String },
}
