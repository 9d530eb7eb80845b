//! browser-sync driven through its CLI.
//!
//! ```text
//! browser-sync start --port 9000 --server <root> --no-notify [--tunnel name]
//! browser-sync reload --port 9000 [--files style.css,vendor.css]
//! ```

use std::sync::Arc;

use anyhow::Result;

use super::DevServer;
use crate::config::PipelineConfig;
use crate::core::{dev_server_running, register_dev_server};
use crate::engine::BuildReport;
use crate::utils::exec::Cmd;
use crate::{debug, log};

pub struct BrowserSync {
    config: Arc<PipelineConfig>,
}

impl BrowserSync {
    pub fn new(config: Arc<PipelineConfig>) -> Self {
        Self { config }
    }

    /// Arguments after the command for `start`.
    fn start_args(&self) -> Vec<String> {
        let serve = &self.config.serve;
        let mut args = vec!["start".to_owned(), "--port".to_owned(), serve.port.to_string()];

        match serve.proxy() {
            Some(domain) => {
                args.push("--proxy".into());
                args.push(domain.into());
            }
            None => {
                args.push("--server".into());
                args.push(self.config.root.to_string_lossy().into_owned());
            }
        }
        if !serve.notify {
            args.push("--no-notify".into());
        }
        if !serve.open {
            args.push("--no-open".into());
        }
        if let Some(name) = &self.config.tunnel {
            args.push("--tunnel".into());
            if !name.is_empty() {
                args.push(name.clone());
            }
        }
        args
    }

    /// Arguments after the command for `reload`.
    ///
    /// `files` are injected instead of reloading the page.
    fn reload_args(&self, files: &[String]) -> Vec<String> {
        let mut args = vec![
            "reload".to_owned(),
            "--port".to_owned(),
            self.config.serve.port.to_string(),
        ];
        if !files.is_empty() {
            args.push("--files".into());
            args.push(files.join(","));
        }
        args
    }

    fn run_reload(&self, files: &[String]) -> Result<()> {
        if !dev_server_running() {
            debug!("serve"; "dev server not running, skipping reload");
            return Ok(());
        }
        Cmd::from_slice(&self.config.serve.command)
            .args(self.reload_args(files))
            .cwd(&self.config.root)
            .run()?;
        Ok(())
    }
}

impl DevServer for BrowserSync {
    fn start(&self) -> Result<()> {
        let child = Cmd::from_slice(&self.config.serve.command)
            .args(self.start_args())
            .cwd(&self.config.root)
            .spawn()?;
        register_dev_server(child);

        let target = self
            .config
            .serve
            .proxy()
            .map_or_else(|| self.config.root.display().to_string(), str::to_owned);
        log!("serve"; "http://localhost:{} -> {}", self.config.serve.port, target);
        Ok(())
    }

    fn has_target(&self) -> bool {
        self.config.serve.proxy().is_some() || self.config.root.is_dir()
    }

    fn reload(&self, report: &BuildReport) -> Result<()> {
        if report.only_styles() {
            let files: Vec<_> = report
                .built
                .iter()
                .map(|p| self.config.root_relative(p).to_string_lossy().into_owned())
                .collect();
            debug!("serve"; "inject {}", files.join(", "));
            self.run_reload(&files)
        } else {
            self.run_reload(&[])
        }
    }

    fn reload_all(&self) -> Result<()> {
        self.run_reload(&[])
    }
}
