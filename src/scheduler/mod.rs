// ABOUTME: Scheduling module for the sapflow execution engine
// ABOUTME: Handles tree validation and bottom-up concurrent task execution

pub mod error;
pub mod executor;
pub mod validate;

pub use error::{GraphError, Result, SchedulerError};
pub use executor::TaskScheduler;
pub use validate::{check_tree, verify_tree};
