//! External development server with live reload.
//!
//! The server runs as a child process (browser-sync by default). Pave only
//! starts it, registers it for shutdown, and asks it to reload after watch
//! rebuilds.

mod browser_sync;

pub use browser_sync::BrowserSync;

use anyhow::Result;

use crate::engine::BuildReport;

/// A live-reload server the pipeline can notify.
pub trait DevServer: Send + Sync {
    /// Start the server in the background.
    fn start(&self) -> Result<()>;

    /// Whether a proxy domain or a static base dir is attached.
    fn has_target(&self) -> bool;

    /// Notify connected browsers about a finished rebuild.
    ///
    /// Stylesheet-only rebuilds are injected without a page reload.
    fn reload(&self, report: &BuildReport) -> Result<()>;

    /// Full page reload (markup changes).
    fn reload_all(&self) -> Result<()>;
}

/// Whether a finished rebuild should reach the dev server.
///
/// Minified builds never reload, and neither do rebuilds that wrote nothing.
pub fn should_reload(server: &dyn DevServer, minify: bool, report: &BuildReport) -> bool {
    !minify && server.has_target() && !report.built.is_empty()
}
