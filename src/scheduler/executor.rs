// ABOUTME: Task scheduler driving bottom-up concurrent execution of a task tree
// ABOUTME: Validates the tree, launches each node as a tokio task, and awaits completion

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument};

use super::error::{Result, SchedulerError};
use super::validate::check_tree;
use crate::task::{TaskRunner, TaskState};

/// Executes a validated task tree to completion.
///
/// Construction validates the tree shape; `start` runs every node as an
/// independently scheduled tokio task, bottom-up: a node transitions to
/// Running only once all of its children are Complete, so a parent always
/// consumes fully produced, closed child streams.
pub struct TaskScheduler {
    root: Arc<dyn TaskRunner>,
    run_id: String,
    node_count: usize,
}

impl TaskScheduler {
    /// Bind a scheduler to a root runner, validating the tree shape.
    ///
    /// Fails with a `GraphError` before any execution if the structure is
    /// not a genuine rooted tree.
    pub fn new(root: Arc<dyn TaskRunner>) -> Result<Self> {
        let node_count = check_tree(&root)?;
        let run_id = uuid::Uuid::new_v4().to_string();

        debug!(
            "Scheduler bound to '{}': {} tasks (run_id: {})",
            root.node().name(),
            node_count,
            run_id
        );

        Ok(Self {
            root,
            run_id,
            node_count,
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn root(&self) -> &Arc<dyn TaskRunner> {
        &self.root
    }

    /// Execute the tree and block until the root reports Complete.
    ///
    /// Failure of any unit of work aborts the remaining in-flight tasks and
    /// surfaces the first error; aborted producers drop their stream
    /// endpoints, so no consumer is left waiting.
    #[instrument(skip(self), fields(run_id = %self.run_id, root = %self.root.node().name()))]
    pub async fn start(&self) -> Result<()> {
        let started = Instant::now();
        info!("Starting run of {} tasks", self.node_count);

        execute(Arc::clone(&self.root)).await?;

        info!("Run completed in {:?}", started.elapsed());
        Ok(())
    }
}

/// Run one node after all of its children. Boxed for async recursion.
fn execute(runner: Arc<dyn TaskRunner>) -> BoxFuture<'static, Result<()>> {
    async move {
        let name = runner.node().name().to_string();

        let mut children = JoinSet::new();
        for child in runner.node().children() {
            children.spawn(execute(child));
        }

        // Every child must reach Complete before this node starts.
        while let Some(joined) = children.join_next().await {
            let result = match joined {
                Ok(result) => result,
                Err(join_err) => Err(SchedulerError::Join(join_err)),
            };

            if let Err(err) = result {
                children.abort_all();
                drain_aborted(&mut children).await;
                return Err(err);
            }
        }

        runner.node().set_state(TaskState::Running)?;
        debug!("Running task: {}", name);

        let mut ctx = runner.node().take_context()?;
        let run_result = runner.run(&mut ctx).await;
        // Dropping the context closes this node's result stream.
        drop(ctx);

        runner.node().set_state(TaskState::Complete)?;

        if let Err(err) = run_result {
            error!("Task '{}' failed: {}", name, err);
            return Err(err.into());
        }

        debug!("Task '{}' complete", name);
        Ok(())
    }
    .boxed()
}

/// Collect the remains of an aborted sibling set, logging real failures.
async fn drain_aborted(children: &mut JoinSet<Result<()>>) {
    while let Some(joined) = children.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(err)) => error!("Sibling task failed during abort: {}", err),
            Err(join_err) if join_err.is_cancelled() => {}
            Err(join_err) => error!("Sibling task panicked: {}", join_err),
        }
    }
}
