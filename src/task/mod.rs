//! Named tasks and their parallel/sequential composition.
//!
//! The graph is a tree of [`TaskNode`]s built once from the configuration.
//! Children are owned by their parent, so the graph is acyclic by
//! construction. Leaves wrap one [`Invoker`](crate::engine::Invoker).

mod graph;
mod node;

pub use graph::{Plan, TaskGraph};
pub use node::TaskNode;

use anyhow::Result;

use crate::engine::{BuildContext, BuildReport};
use crate::log;
use crate::serve::{DevServer, should_reload};

/// Run a node, then notify the dev server about what it wrote.
///
/// Reload failures are logged, never returned: the build itself succeeded.
pub fn run_with_reload(
    node: &TaskNode,
    ctx: &BuildContext,
    server: Option<&dyn DevServer>,
) -> Result<BuildReport> {
    let report = node.run(ctx)?;

    if let Some(server) = server
        && should_reload(server, ctx.config.minify(), &report)
        && let Err(err) = server.reload(&report)
    {
        log!("serve"; "reload failed: {err:#}");
    }
    Ok(report)
}
