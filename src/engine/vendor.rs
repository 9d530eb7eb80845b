//! Vendor invoker: copy third-party dist files into `vendor/assets/<name>/`.
//!
//! Each `[[vendor.packages]]` entry becomes its own [`AssetGroup`]. Files are
//! copied verbatim, underscore-prefixed ones included.

use std::fs;

use anyhow::{Context, Result};

use super::{BuildContext, BuildOptions, BuildReport, Invoker, plan_targets, run_targets};
use crate::log;
use crate::paths::{AssetGroup, BuildTarget};

#[derive(Debug, Default)]
pub struct VendorInvoker;

impl VendorInvoker {
    pub const fn new() -> Self {
        Self
    }
}

fn copy(target: &BuildTarget) -> Result<()> {
    if let Some(parent) = target.output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(&target.input, &target.output).with_context(|| {
        format!(
            "Failed to copy {} to {}",
            target.input.display(),
            target.output.display()
        )
    })?;
    Ok(())
}

impl Invoker for VendorInvoker {
    fn label(&self) -> String {
        "vendor copy".to_owned()
    }

    fn module(&self) -> &'static str {
        "vendor"
    }

    fn build(&self, ctx: &BuildContext, options: BuildOptions) -> Result<BuildReport> {
        let config = &ctx.config;
        let project_dir = config.project_join("");
        let options = BuildOptions {
            minify: false,
            force: options.force || config.vendor.force,
        };

        let mut report = BuildReport::new();
        for package in &config.vendor.packages {
            let group = AssetGroup::vendor_package(&ctx.layout, package, &project_dir);
            let mut package_report = BuildReport::new();
            let targets = plan_targets(&group, options, &mut package_report)?;

            if targets.is_empty() && package_report.is_empty() {
                log!("warning"; "{}: no files match `{}`", package.name, package.src);
                continue;
            }
            run_targets(ctx, self.module(), &targets, &mut package_report, copy);
            report.merge(package_report);
        }

        report.finish(&self.label(), ctx.mode)
    }
}
