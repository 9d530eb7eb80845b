//! `[serve]` section configuration.
//!
//! Settings for the external live-reload server started by `default`.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! command = ["browser-sync"]  # or ["npx", "browser-sync"]
//! port = 9000                 # HTTP port number
//! proxy = ""                  # e.g. "mysite.local", empty serves layout.root
//! notify = false              # in-browser notifications
//! open = true                 # open a browser tab on start
//! ```
//!
//! `--tunnel[=NAME]` on the command line exposes the server publicly.

use serde::{Deserialize, Serialize};

use super::validate_command;
use crate::config::{ConfigDiagnostics, FieldPath};

/// Development server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    pub command: Vec<String>,

    /// HTTP port number.
    pub port: u16,

    /// Domain to proxy. Empty means a static server over `layout.root`.
    pub proxy: String,

    pub notify: bool,

    pub open: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            command: vec!["browser-sync".into()],
            port: 9000,
            proxy: String::new(),
            notify: false,
            open: true,
        }
    }
}

impl ServeConfig {
    /// Proxy domain, if one is configured.
    pub fn proxy(&self) -> Option<&str> {
        let proxy = self.proxy.trim();
        (!proxy.is_empty()).then_some(proxy)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        validate_command(&self.command, FieldPath::new("serve.command"), diag);

        if self.port == 0 {
            diag.error(FieldPath::new("serve.port"), "port must not be 0");
        }
        if self.proxy.contains(char::is_whitespace) {
            diag.error_with_hint(
                FieldPath::new("serve.proxy"),
                format!("`{}` is not a valid proxy target", self.proxy),
                "use a host such as `mysite.local` or `localhost:8080`",
            );
        }
    }
}
