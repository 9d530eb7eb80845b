//! Pave - a front-end asset pipeline.

mod cli;
mod config;
mod core;
mod engine;
mod freshness;
mod logger;
mod paths;
mod serve;
mod task;
mod utils;
mod watch;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};

use cli::Cli;
use config::PipelineConfig;
use engine::{BuildContext, ErrorMode};
use serve::{BrowserSync, DevServer};
use task::{Plan, TaskGraph, TaskNode};

fn main() -> Result<()> {
    // Before anything that may block, so Ctrl+C always stops the dev server
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    logger::set_verbose(cli.verbose);

    let config = Arc::new(PipelineConfig::load(&cli)?);
    debug!("config"; "root {}", config.root.display());

    let graph = TaskGraph::new(&config);
    match graph.plan(cli.task) {
        Some(Plan::Run(node)) => run_once(&node, config),
        Some(Plan::Watch { serve }) => run_watch(&graph, config, serve),
        None => anyhow::bail!("task `{}` is not registered", cli.task),
    }
}

/// Single-shot build: any failed file fails the process.
fn run_once(node: &TaskNode, config: Arc<PipelineConfig>) -> Result<()> {
    let mode = if config.production { "production" } else { "development" };
    log!("task"; "{} ({mode})", node.name);

    let started = Instant::now();
    let ctx = BuildContext::new(config, ErrorMode::Propagate);
    let report = node.run(&ctx)?;

    log!(
        "task";
        "{} finished in {:.2?}: {}",
        node.name,
        started.elapsed(),
        report.summary()
    );
    Ok(())
}

/// `watch` and `default`: rebuild on change until Ctrl+C.
fn run_watch(graph: &TaskGraph, config: Arc<PipelineConfig>, serve: bool) -> Result<()> {
    let server: Option<Arc<dyn DevServer>> =
        serve.then(|| Arc::new(BrowserSync::new(Arc::clone(&config))) as Arc<dyn DevServer>);
    let ctx = BuildContext::new(config, ErrorMode::Continue);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let result = runtime.block_on(watch::run(ctx, graph, server));
    core::stop_dev_server();
    result
}
