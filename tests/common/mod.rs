// ABOUTME: Common runner implementations for integration tests
// ABOUTME: Provides emitting, concatenating, and repeating tasks for building test trees

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use sapflow::{
    BindError, ParamKind, ParamSpec, ParamValue, Parameters, TaskContext, TaskError, TaskNode,
    TaskRunner,
};

/// Leaf runner that emits a fixed sequence of literal values.
pub struct EmitTask {
    node: TaskNode,
    values: Vec<String>,
}

impl EmitTask {
    pub fn new(name: &str, values: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            node: TaskNode::new(name),
            values: values.iter().map(|v| v.to_string()).collect(),
        })
    }
}

#[async_trait]
impl TaskRunner for EmitTask {
    async fn run(&self, ctx: &mut TaskContext) -> Result<(), TaskError> {
        for value in &self.values {
            ctx.emit(value.clone())?;
        }
        Ok(())
    }

    fn node(&self) -> &TaskNode {
        &self.node
    }
}

/// Runner that drains every child stream in child order, concatenates the
/// values, records the result, and forwards it upward when it has a parent.
pub struct ConcatTask {
    node: TaskNode,
    accumulated: Mutex<String>,
}

impl ConcatTask {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            node: TaskNode::new(name),
            accumulated: Mutex::new(String::new()),
        })
    }

    pub fn accumulated(&self) -> String {
        self.accumulated.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskRunner for ConcatTask {
    async fn run(&self, ctx: &mut TaskContext) -> Result<(), TaskError> {
        let mut combined = String::new();
        for input in ctx.inputs() {
            while let Some(value) = input.recv().await {
                combined.push_str(&value);
            }
        }

        *self.accumulated.lock().unwrap() = combined.clone();

        if ctx.has_parent() {
            ctx.emit(combined)?;
        }
        Ok(())
    }

    fn node(&self) -> &TaskNode {
        &self.node
    }
}

/// Leaf runner that emits its string input repeated `multiplier` times.
/// Both fields are declared task parameters.
pub struct RepeatTask {
    node: TaskNode,
    pub input: String,
    pub multiplier: i64,
}

impl RepeatTask {
    /// Construct without binding parameters onto the node.
    pub fn unbound(name: &str, input: &str, multiplier: i64) -> Self {
        Self {
            node: TaskNode::new(name),
            input: input.to_string(),
            multiplier,
        }
    }

    pub fn new(name: &str, input: &str, multiplier: i64) -> Arc<Self> {
        let task = Self::unbound(name, input, multiplier);
        sapflow::task::bind(&task);
        Arc::new(task)
    }
}

impl Parameters for RepeatTask {
    fn param_specs() -> &'static [ParamSpec<Self>] {
        const SPECS: &[ParamSpec<RepeatTask>] = &[
            ParamSpec {
                name: "input",
                kind: ParamKind::Str,
                get: |t| ParamValue::Str(t.input.clone()),
                set: |t, v| match v {
                    ParamValue::Str(value) => {
                        t.input = value;
                        Ok(())
                    }
                    other => Err(BindError::KindMismatch {
                        field: "input".to_string(),
                        expected: ParamKind::Str,
                        actual: other.kind(),
                    }),
                },
            },
            ParamSpec {
                name: "multiplier",
                kind: ParamKind::Int,
                get: |t| ParamValue::Int(t.multiplier),
                set: |t, v| match v {
                    ParamValue::Int(value) => {
                        t.multiplier = value;
                        Ok(())
                    }
                    other => Err(BindError::KindMismatch {
                        field: "multiplier".to_string(),
                        expected: ParamKind::Int,
                        actual: other.kind(),
                    }),
                },
            },
        ];
        SPECS
    }
}

#[async_trait]
impl TaskRunner for RepeatTask {
    async fn run(&self, ctx: &mut TaskContext) -> Result<(), TaskError> {
        ctx.emit(self.input.repeat(self.multiplier.max(0) as usize))?;
        Ok(())
    }

    fn node(&self) -> &TaskNode {
        &self.node
    }
}

/// Runner that always fails, for exercising abort behavior.
pub struct FailTask {
    node: TaskNode,
}

impl FailTask {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            node: TaskNode::new(name),
        })
    }
}

#[async_trait]
impl TaskRunner for FailTask {
    async fn run(&self, _ctx: &mut TaskContext) -> Result<(), TaskError> {
        Err(TaskError::Failed {
            task: self.node.name().to_string(),
            message: "intentional failure".to_string(),
        })
    }

    fn node(&self) -> &TaskNode {
        &self.node
    }
}
