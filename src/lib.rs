// ABOUTME: Main library module for the sapflow task execution engine
// ABOUTME: Exports all core modules and provides the public API

pub mod scheduler;
pub mod task;

// Re-export commonly used types
pub use scheduler::{GraphError, SchedulerError, TaskScheduler};
pub use task::{
    BindError, ParamKind, ParamSpec, ParamValue, Parameters, TaskContext, TaskError, TaskInput,
    TaskNode, TaskParam, TaskRunner, TaskState,
};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
