// ABOUTME: Task node identity, state, parameters, and result stream wiring
// ABOUTME: Owns child runners and the channel endpoints connecting a node to its parent

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

use super::error::TaskError;
use super::params::TaskParam;
use super::runner::{TaskContext, TaskInput, TaskRunner};
use super::state::TaskState;

/// The identity, state, parameters, and stream endpoints of one unit of work.
///
/// A node exclusively owns its children. The parent back-reference is a name
/// kept for diagnostics only; result routing is carried entirely by the
/// channel wiring installed when a child is attached.
pub struct TaskNode {
    name: String,
    state: Mutex<StateRecord>,
    params: Mutex<Vec<TaskParam>>,
    children: Mutex<Vec<Arc<dyn TaskRunner>>>,
    parent_name: Mutex<Option<String>>,
    wiring: Mutex<Wiring>,
}

#[derive(Debug, Clone, Copy)]
struct StateRecord {
    state: TaskState,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

/// Stream endpoints installed by `add_child` and taken once at start.
#[derive(Default)]
struct Wiring {
    output: Option<mpsc::UnboundedSender<String>>,
    inputs: Vec<TaskInput>,
    taken: bool,
}

impl TaskNode {
    /// Create a node in the Waiting state with no parameters and no children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(StateRecord {
                state: TaskState::Waiting,
                started_at: None,
                completed_at: None,
            }),
            params: Mutex::new(Vec::new()),
            children: Mutex::new(Vec::new()),
            parent_name: Mutex::new(None),
            wiring: Mutex::new(Wiring::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> TaskState {
        lock(&self.state).state
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        lock(&self.state).started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        lock(&self.state).completed_at
    }

    pub fn params(&self) -> Vec<TaskParam> {
        lock(&self.params).clone()
    }

    /// Replace the node's parameter list. Called once by the parameter binder
    /// before validation; the identity hash must not change afterwards.
    pub fn set_params(&self, params: Vec<TaskParam>) {
        *lock(&self.params) = params;
    }

    pub fn children(&self) -> Vec<Arc<dyn TaskRunner>> {
        lock(&self.children).clone()
    }

    pub fn parent_name(&self) -> Option<String> {
        lock(&self.parent_name).clone()
    }

    /// Transition to `next`, enforcing the monotonic state machine.
    ///
    /// Returns the new state, or `InvalidState` if the transition is not
    /// legal from the current state.
    pub fn set_state(&self, next: TaskState) -> Result<TaskState, TaskError> {
        let mut record = lock(&self.state);

        if !record.state.can_transition_to(next) {
            return Err(TaskError::InvalidState {
                task: self.name.clone(),
                from: record.state,
                to: next,
            });
        }

        record.state = next;
        match next {
            TaskState::Running => record.started_at = Some(Utc::now()),
            TaskState::Complete => record.completed_at = Some(Utc::now()),
            TaskState::Waiting => {}
        }

        Ok(next)
    }

    /// Attach `child` to this node, wiring the child's result stream into
    /// this node's inputs.
    ///
    /// Must only be called while building the tree, before it is handed to
    /// the scheduler. Attaching a runner that already has a parent re-wires
    /// its stream; the duplicate membership is rejected by tree validation.
    pub fn add_child(&self, child: Arc<dyn TaskRunner>) {
        let (tx, rx) = mpsc::unbounded_channel();

        child.node().attach_to_parent(&self.name, tx);

        let mut wiring = lock(&self.wiring);
        wiring.inputs.push(TaskInput::new(child.node().name(), rx));
        drop(wiring);

        lock(&self.children).push(child);
    }

    /// Attach multiple children in order.
    pub fn add_children(&self, children: impl IntoIterator<Item = Arc<dyn TaskRunner>>) {
        for child in children {
            self.add_child(child);
        }
    }

    fn attach_to_parent(&self, parent: &str, output: mpsc::UnboundedSender<String>) {
        *lock(&self.parent_name) = Some(parent.to_string());
        lock(&self.wiring).output = Some(output);
    }

    /// Take the node's stream endpoints for a run. Valid exactly once; the
    /// scheduler calls this immediately before invoking `run`.
    pub(crate) fn take_context(&self) -> Result<TaskContext, TaskError> {
        let mut wiring = lock(&self.wiring);

        if wiring.taken {
            return Err(TaskError::NotWired {
                task: self.name.clone(),
            });
        }
        wiring.taken = true;

        let inputs = std::mem::take(&mut wiring.inputs);
        let output = wiring.output.take();

        Ok(TaskContext::new(self.name.clone(), inputs, output))
    }

    /// The node's identity key, used only for graph validation.
    ///
    /// Layout: the name, the `name:value` parameter renderings joined by
    /// `_`, and the hex SHA-256 of that parameter string, all joined by `_`.
    /// Pure in the node's name and current parameter list, so it is stable
    /// once parameters are bound.
    pub fn identity_hash(&self) -> String {
        let params = lock(&self.params);
        let param_string = params
            .iter()
            .map(|param| param.to_string())
            .collect::<Vec<_>>()
            .join("_");

        let digest = Sha256::digest(param_string.as_bytes());
        format!("{}_{}_{}", self.name, param_string, hex::encode(digest))
    }
}

impl std::fmt::Debug for TaskNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskNode")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("params", &self.params())
            .field("children", &self.children().len())
            .field("parent", &self.parent_name())
            .finish()
    }
}

// Lock helper: the node's locks are held only for short critical sections
// and never across await points, so poisoning means a panic already tore
// down the run.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().expect("task node lock poisoned")
}
