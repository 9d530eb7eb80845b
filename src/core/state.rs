//! Process state for long-running tasks.
//!
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)
//! - `BUSY`: Is a watch-triggered rebuild in progress?

use std::process::Child;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// A rebuild triggered by the watcher is running
static BUSY: AtomicBool = AtomicBool::new(false);

/// Shutdown signal sender for the watch loop
static SHUTDOWN_TX: OnceLock<UnboundedSender<()>> = OnceLock::new();

/// Dev server child process, stopped on shutdown
static DEV_SERVER: Mutex<Option<Child>> = Mutex::new(None);

// =============================================================================
// BUSY state
// =============================================================================

pub fn is_busy() -> bool {
    BUSY.load(Ordering::Acquire)
}

pub fn begin_update() {
    BUSY.store(true, Ordering::Release);
}

pub fn end_update() {
    BUSY.store(false, Ordering::Release);
}

// =============================================================================
// SHUTDOWN state
// =============================================================================

/// Setup the global Ctrl+C handler. Call once at program start.
///
/// - Before `register_watcher()`: stop the dev server and exit
/// - After `register_watcher()`: stop the dev server and let the watch loop return
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);
        stop_dev_server();

        match SHUTDOWN_TX.get() {
            Some(tx) => {
                if is_busy() {
                    crate::log!("watch"; "shutting down after the current rebuild...");
                } else {
                    crate::log!("watch"; "shutting down...");
                }
                let _ = tx.send(());
            }
            None => std::process::exit(0),
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the watch loop's shutdown channel.
pub fn register_watcher(shutdown_tx: UnboundedSender<()>) {
    let _ = SHUTDOWN_TX.set(shutdown_tx);
}

/// Hand the dev server process over for shutdown handling.
pub fn register_dev_server(child: Child) {
    *DEV_SERVER.lock() = Some(child);
}

/// Kill the dev server if one is running. Safe to call more than once.
pub fn stop_dev_server() {
    if let Some(mut child) = DEV_SERVER.lock().take() {
        let _ = child.kill();
        let _ = child.wait();
    }
}

/// Whether the registered dev server process is still alive.
pub fn dev_server_running() -> bool {
    DEV_SERVER
        .lock()
        .as_mut()
        .is_some_and(|child| matches!(child.try_wait(), Ok(None)))
}

/// Check if shutdown has been requested.
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn test_busy() {
        BUSY.store(false, Ordering::SeqCst);

        begin_update();
        assert!(is_busy());

        end_update();
        assert!(!is_busy());
    }

    #[test]
    fn test_dev_server_lifecycle() {
        let child = Command::new("sleep").arg("30").spawn().unwrap();
        register_dev_server(child);
        assert!(dev_server_running());

        stop_dev_server();
        assert!(!dev_server_running());
        stop_dev_server();
    }
}
