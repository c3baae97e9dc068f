// ABOUTME: Task model module for the sapflow execution engine
// ABOUTME: Defines task nodes, states, parameters, and the runner contract

pub mod error;
pub mod node;
pub mod params;
pub mod runner;
pub mod state;

pub use error::TaskError;
pub use node::TaskNode;
pub use params::{
    apply, bind, extract, BindError, ParamKind, ParamSpec, ParamValue, Parameters, TaskParam,
};
pub use runner::{TaskContext, TaskInput, TaskRunner};
pub use state::TaskState;
