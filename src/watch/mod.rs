//! Watch mode: rebuild the bound task whenever a source changes.
//!
//! ```text
//! notify (sync) ─► bridge thread ─► Debouncer ─► Bindings ─► spawn_blocking(task)
//!                                                    └────► dev server reload
//! ```
//!
//! The watcher is created before the dev server starts, so no change made
//! during startup is lost. Rebuilds run one at a time, in binding order.

mod bindings;
mod debouncer;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use notify::{RecursiveMode, Watcher};
use tokio::sync::mpsc;

use bindings::{Action, Binding, Bindings};
use debouncer::Debouncer;

use crate::core;
use crate::engine::{BuildContext, BuildReport};
use crate::logger;
use crate::serve::DevServer;
use crate::task::{TaskGraph, run_with_reload};
use crate::utils::path::relative_display;
use crate::{debug, log};

/// Watch until Ctrl+C. Starts `server` alongside when given.
pub async fn run(
    ctx: BuildContext,
    graph: &TaskGraph,
    server: Option<Arc<dyn DevServer>>,
) -> Result<()> {
    let bindings = Bindings::new(&ctx, graph)?;
    let roots = bindings.watch_roots();

    let (notify_tx, notify_rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = notify_tx.send(res);
    })
    .context("Failed to create file watcher")?;
    for root in &roots {
        watcher
            .watch(root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", root.display()))?;
    }

    let (shutdown_tx, mut shutdown_rx) = mpsc::unbounded_channel();
    core::register_watcher(shutdown_tx);

    if let Some(server) = &server {
        server.start()?;
    }
    log!("watch"; "watching {} folder(s), Ctrl+C to stop", roots.len());
    for root in &roots {
        debug!("watch"; "{}", root.display());
    }

    // notify has no async API: forward events from a plain thread
    let (event_tx, mut event_rx) = mpsc::channel::<notify::Event>(64);
    std::thread::spawn(move || {
        while let Ok(result) = notify_rx.recv() {
            match result {
                Ok(event) => {
                    if event_tx.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(e) => log!("watch"; "notify error: {}", e),
            }
        }
    });

    let ctx = Arc::new(ctx);
    let mut debouncer = Debouncer::new();
    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => break,
            Some(event) = event_rx.recv() => debouncer.add_event(&event),
            () = tokio::time::sleep(debouncer.sleep_duration()) => {
                let Some(changes) = debouncer.take_if_ready() else { continue };
                for (path, kind) in &changes {
                    debug!("watch"; "{} {}", kind.label(), ctx.display(path));
                }
                let paths: Vec<PathBuf> = changes.into_keys().collect();
                dispatch(&ctx, &bindings, &paths, server.clone()).await;
            }
        }
        if core::is_shutdown() {
            break;
        }
    }

    drop(watcher);
    core::stop_dev_server();
    Ok(())
}

/// Run every binding hit by `paths`.
async fn dispatch(
    ctx: &Arc<BuildContext>,
    bindings: &Bindings,
    paths: &[PathBuf],
    server: Option<Arc<dyn DevServer>>,
) {
    let hits = bindings.matching(paths);
    if hits.is_empty() {
        return;
    }
    let changed = paths
        .iter()
        .map(|p| relative_display(p, &ctx.layout.root).into_owned())
        .collect::<Vec<_>>()
        .join(", ");
    logger::status_detach();
    log!("watch"; "changed: {}", changed);

    for binding in hits {
        match &binding.action {
            Action::Reload => {
                if let Some(server) = &server
                    && server.has_target()
                    && let Err(err) = server.reload_all()
                {
                    log!("serve"; "reload failed: {err:#}");
                }
            }
            Action::Run(_) => {
                let result = rebuild(ctx, binding, server.clone()).await;
                report_outcome(&binding.name, result);
            }
        }
    }
}

async fn rebuild(
    ctx: &Arc<BuildContext>,
    binding: &Binding,
    server: Option<Arc<dyn DevServer>>,
) -> Result<BuildReport> {
    let Action::Run(node) = &binding.action else {
        return Ok(BuildReport::new());
    };
    let node = Arc::clone(node);
    let ctx = Arc::clone(ctx);

    tokio::task::spawn_blocking(move || {
        core::begin_update();
        let result = run_with_reload(&node, &ctx, server.as_deref());
        core::end_update();
        result
    })
    .await
    .context("rebuild task panicked")?
}

fn report_outcome(name: &str, result: Result<BuildReport>) {
    match result {
        // per-file failures were already printed by the invoker
        Ok(report) if report.has_failures() => {}
        Ok(report) if report.built.is_empty() => {
            logger::status_unchanged(&format!("{name}: {}", report.summary()));
        }
        Ok(report) => {
            logger::status_detach();
            logger::status_success(&format!("{name}: {}", report.summary()));
        }
        Err(err) => {
            logger::status_detach();
            logger::status_error(&format!("{name}: failed"), &format!("{err:#}"));
        }
    }
}
