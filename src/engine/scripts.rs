//! Script invoker: one bundler run per entry file.
//!
//! Entries are the non-partial scripts of a source folder. With no entries
//! the bundler is not started at all. Minified bundles are compressed
//! in-process with oxc afterwards.

use std::fs;

use anyhow::{Context, Result};

use super::js::minify_js;
use super::vars::{resolve_args, target_vars};
use super::{BuildContext, BuildOptions, BuildReport, Invoker, plan_targets, run_targets};
use crate::log;
use crate::paths::{AssetGroup, BuildTarget, Layout, Scope};
use crate::utils::exec::Cmd;

pub struct ScriptsInvoker {
    group: AssetGroup,
    /// Ignore mtimes. A bundle changes when any imported module does.
    always_force: bool,
}

impl ScriptsInvoker {
    pub fn new(layout: &Layout, scope: Scope, extension: &str) -> Self {
        Self {
            group: AssetGroup::scripts(layout, scope, extension),
            always_force: scope == Scope::Template,
        }
    }

    fn bundle(&self, ctx: &BuildContext, target: &BuildTarget) -> Result<()> {
        let scripts = &ctx.config.scripts;
        let vars = target_vars(target, &ctx.layout.root, ctx.config.production);

        let extra = if target.minify {
            &scripts.build_args
        } else {
            &scripts.dev_args
        };
        let mut command = resolve_args(&scripts.command, &vars);
        command.extend(resolve_args(extra, &vars));

        if let Some(parent) = target.output.parent() {
            fs::create_dir_all(parent)?;
        }
        Cmd::from_slice(&command)
            .cwd(&ctx.layout.root)
            .envs(&vars)
            .run()?;

        if target.minify {
            let bundle = fs::read_to_string(&target.output)
                .with_context(|| format!("bundler did not write `{}`", target.output.display()))?;
            match minify_js(&bundle) {
                Some(minified) => fs::write(&target.output, minified)?,
                None => log!(
                    "warning";
                    "could not minify {}, keeping bundler output",
                    ctx.display(&target.output)
                ),
            }
        }
        Ok(())
    }
}

impl Invoker for ScriptsInvoker {
    fn label(&self) -> String {
        self.group.label()
    }

    fn module(&self) -> &'static str {
        "scripts"
    }

    fn build(&self, ctx: &BuildContext, options: BuildOptions) -> Result<BuildReport> {
        let options = BuildOptions {
            force: options.force || self.always_force,
            ..options
        };

        let mut report = BuildReport::new();
        let targets = plan_targets(&self.group, options, &mut report)?;
        run_targets(ctx, self.module(), &targets, &mut report, |target| {
            self.bundle(ctx, target)
        });

        report.finish(&self.label(), ctx.mode)
    }
}
