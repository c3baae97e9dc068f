// ABOUTME: Task runner contract and the per-run stream context
// ABOUTME: Defines the trait every unit of work implements and its result stream endpoints

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::TaskError;
use super::node::TaskNode;

/// The contract every concrete unit of work implements.
///
/// The engine only ever interacts with this trait, never with concrete
/// runner types. `run` reads from child streams via the context and emits
/// its own results to its parent; `node` exposes the identity and state
/// record owned by the runner.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    async fn run(&self, ctx: &mut TaskContext) -> Result<(), TaskError>;

    fn node(&self) -> &TaskNode;
}

/// The inbound end of one child's result stream.
#[derive(Debug)]
pub struct TaskInput {
    name: String,
    rx: mpsc::UnboundedReceiver<String>,
}

impl TaskInput {
    pub(crate) fn new(name: impl Into<String>, rx: mpsc::UnboundedReceiver<String>) -> Self {
        Self {
            name: name.into(),
            rx,
        }
    }

    /// Name of the child this stream comes from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Receive the next result, or `None` once the child's stream is closed.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Drain the stream to closure, collecting every remaining result.
    pub async fn collect(&mut self) -> Vec<String> {
        let mut values = Vec::new();
        while let Some(value) = self.rx.recv().await {
            values.push(value);
        }
        values
    }
}

/// Stream endpoints handed to a runner for the duration of one `run` call.
///
/// The context owns the outbound sender, so the node's result stream closes
/// when the context is dropped, on every exit path of `run` including error
/// returns and cancellation. `close` exists for runners that finish
/// producing before they finish running.
#[derive(Debug)]
pub struct TaskContext {
    task: String,
    inputs: Vec<TaskInput>,
    output: Option<mpsc::UnboundedSender<String>>,
}

impl TaskContext {
    pub(crate) fn new(
        task: String,
        inputs: Vec<TaskInput>,
        output: Option<mpsc::UnboundedSender<String>>,
    ) -> Self {
        Self {
            task,
            inputs,
            output,
        }
    }

    /// Inbound streams, one per child, in the order children were attached.
    pub fn inputs(&mut self) -> &mut [TaskInput] {
        &mut self.inputs
    }

    pub fn inputs_len(&self) -> usize {
        self.inputs.len()
    }

    /// Whether this node has a parent consuming its results.
    pub fn has_parent(&self) -> bool {
        self.output.is_some()
    }

    /// Send one result to the parent's consumption point.
    ///
    /// Fails with `NoParent` on the root and `StreamClosed` if the consumer
    /// is gone (the run is being torn down).
    pub fn emit(&self, value: impl Into<String>) -> Result<(), TaskError> {
        match &self.output {
            Some(tx) => tx.send(value.into()).map_err(|_| TaskError::StreamClosed {
                task: self.task.clone(),
            }),
            None => Err(TaskError::NoParent {
                task: self.task.clone(),
            }),
        }
    }

    /// Close the outbound stream early. Idempotent; dropping the context has
    /// the same effect.
    pub fn close(&mut self) {
        self.output = None;
    }
}
