//! Task nodes and their execution.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use parking_lot::Mutex;
use rayon::prelude::*;

use crate::debug;
use crate::engine::{BuildContext, BuildOptions, BuildReport, Invoker};

/// Lifecycle of a node within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Done,
    Failed,
}

/// One invoker plus the passes it runs with.
///
/// Production style and script leaves have two passes: minified, then
/// unminified.
pub struct Leaf {
    pub invoker: Arc<dyn Invoker>,
    pub passes: Vec<BuildOptions>,
}

pub enum TaskKind {
    Leaf(Leaf),
    Parallel(Vec<Arc<TaskNode>>),
    Sequential(Vec<Arc<TaskNode>>),
}

pub struct TaskNode {
    pub name: String,
    pub kind: TaskKind,
    state: Mutex<TaskState>,
}

impl TaskNode {
    pub fn leaf(name: impl Into<String>, invoker: Arc<dyn Invoker>, passes: Vec<BuildOptions>) -> Self {
        Self::new(name, TaskKind::Leaf(Leaf { invoker, passes }))
    }

    pub fn parallel(name: impl Into<String>, children: Vec<Arc<TaskNode>>) -> Self {
        Self::new(name, TaskKind::Parallel(children))
    }

    pub fn sequential(name: impl Into<String>, children: Vec<Arc<TaskNode>>) -> Self {
        Self::new(name, TaskKind::Sequential(children))
    }

    fn new(name: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            name: name.into(),
            kind,
            state: Mutex::new(TaskState::Pending),
        }
    }

    pub fn state(&self) -> TaskState {
        *self.state.lock()
    }

    fn set_state(&self, state: TaskState) {
        *self.state.lock() = state;
    }

    /// Reset this node and its descendants to `Pending`.
    fn reset(&self) {
        self.set_state(TaskState::Pending);
        if let TaskKind::Parallel(children) | TaskKind::Sequential(children) = &self.kind {
            children.iter().for_each(|child| child.reset());
        }
    }

    /// Run the node to completion.
    ///
    /// Parallel children all run even when one fails; the first failure is
    /// returned. Sequential children stop at the first failure.
    pub fn run(&self, ctx: &BuildContext) -> Result<BuildReport> {
        self.reset();
        self.execute(ctx)
    }

    fn execute(&self, ctx: &BuildContext) -> Result<BuildReport> {
        self.set_state(TaskState::Running);
        debug!("task"; "{} started", self.name);

        let result = match &self.kind {
            TaskKind::Leaf(leaf) => run_leaf(leaf, ctx)
                .with_context(|| format!("task `{}` failed", self.name)),
            TaskKind::Parallel(children) => run_parallel(children, ctx),
            TaskKind::Sequential(children) => run_sequential(children, ctx),
        };

        self.set_state(if result.is_ok() {
            TaskState::Done
        } else {
            TaskState::Failed
        });
        debug!("task"; "{} {:?}", self.name, self.state());
        result
    }
}

fn run_leaf(leaf: &Leaf, ctx: &BuildContext) -> Result<BuildReport> {
    let mut report = BuildReport::new();
    for &options in &leaf.passes {
        report.merge(leaf.invoker.build(ctx, options)?);
    }
    Ok(report)
}

fn run_parallel(children: &[Arc<TaskNode>], ctx: &BuildContext) -> Result<BuildReport> {
    let results: Vec<_> = children.par_iter().map(|child| child.execute(ctx)).collect();

    let mut report = BuildReport::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(child) => report.merge(child),
            Err(err) => errors.push(err),
        }
    }

    match errors.len() {
        0 => Ok(report),
        1 => Err(errors.remove(0)),
        _ => Err(anyhow!(
            "{}",
            errors
                .iter()
                .map(|e| format!("{e:#}"))
                .collect::<Vec<_>>()
                .join("\n")
        )),
    }
}

fn run_sequential(children: &[Arc<TaskNode>], ctx: &BuildContext) -> Result<BuildReport> {
    let mut report = BuildReport::new();
    for child in children {
        report.merge(child.execute(ctx)?);
    }
    Ok(report)
}
