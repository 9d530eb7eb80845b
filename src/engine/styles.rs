//! Stylesheet invoker: Sass compiler, then lightningcss.
//!
//! ```text
//! sass --load-path=node_modules --load-path=assets/_source
//!      --load-path=vendor/assets/_source --no-source-map <input>
//! ```
//!
//! The compiler's stdout is post-processed in-process (see `css`) and
//! written next to the source folder.

use anyhow::{Context, Result};

use super::css::{self, CssOptions};
use super::{BuildContext, BuildOptions, BuildReport, Invoker, plan_targets, run_targets};
use crate::paths::{AssetGroup, BuildTarget, Layout, Scope};
use crate::utils::exec::{Cmd, FilterRule};
use crate::utils::path::write_output;

/// Sass chatter that is not actionable per build.
static SASS_FILTER: FilterRule = FilterRule::new(&[
    "Deprecation Warning",
    "More info and automated migrator",
    "Recommendation:",
]);

pub struct StylesInvoker {
    group: AssetGroup,
    /// Ignore mtimes. Entry files do not change when only a partial does.
    always_force: bool,
}

impl StylesInvoker {
    pub fn new(layout: &Layout, scope: Scope, extension: &str) -> Self {
        Self {
            group: AssetGroup::styles(layout, scope, extension),
            always_force: scope == Scope::Template,
        }
    }

    fn compile(&self, ctx: &BuildContext, target: &BuildTarget, options: &CssOptions) -> Result<()> {
        let config = &ctx.config;
        let load_paths = config
            .styles
            .include_paths
            .iter()
            .cloned()
            .chain([
                ctx.layout.source_root(Scope::Template),
                ctx.layout.source_root(Scope::Vendor),
            ])
            .map(|p| format!("--load-path={}", p.display()));

        let output = Cmd::from_slice(&config.styles.command)
            .args(load_paths)
            .arg("--no-source-map")
            .arg(&target.input)
            .cwd(&ctx.layout.root)
            .filter(&SASS_FILTER)
            .run()?;

        let compiled = String::from_utf8(output.stdout).context("compiler output is not UTF-8")?;
        let filename = target.input.to_string_lossy();
        let processed = css::process(&compiled, &filename, &CssOptions {
            minify: target.minify,
            ..*options
        })?;

        write_output(&target.output, processed)
    }
}

impl Invoker for StylesInvoker {
    fn label(&self) -> String {
        self.group.label()
    }

    fn module(&self) -> &'static str {
        "styles"
    }

    fn build(&self, ctx: &BuildContext, options: BuildOptions) -> Result<BuildReport> {
        let options = BuildOptions {
            force: options.force || self.always_force,
            ..options
        };

        let mut report = BuildReport::new();
        let targets = plan_targets(&self.group, options, &mut report)?;

        if !targets.is_empty() {
            let css_options = CssOptions {
                targets: css::resolve_targets(&ctx.config.styles.targets)?,
                group_media: ctx.config.styles.group_media_queries,
                minify: options.minify,
            };
            run_targets(ctx, self.module(), &targets, &mut report, |target| {
                self.compile(ctx, target, &css_options)
            });
        }

        report.finish(&self.label(), ctx.mode)
    }
}
