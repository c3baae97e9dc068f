// ABOUTME: Error types for tree validation and scheduled execution
// ABOUTME: Defines graph-shape rejections and run-time scheduler failures

use thiserror::Error;

use crate::task::TaskError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Task tree is not a valid tree: node '{name}' reachable twice (identity {hash})")]
    DuplicateNode { name: String, hash: String },
}

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Graph validation failed: {0}")]
    Graph(#[from] GraphError),

    #[error("Task error: {0}")]
    Task(#[from] TaskError),

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
