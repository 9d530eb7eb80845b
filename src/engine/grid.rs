//! Grid invoker: generate the grid mixin stylesheet from `[grid]`.
//!
//! The file lands in the vendor source folder as a partial, so vendor and
//! template styles can `@use` or `@import` it:
//!
//! ```scss
//! .card-list { @include row-flex; }
//! .card { @include col; @include size(12); @include size-md(4); }
//! ```
//!
//! Arithmetic is emitted as CSS `calc()`, never as Sass division.

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;

use super::{BuildContext, BuildOptions, BuildReport, Invoker};
use crate::config::GridConfig;
use crate::log;
use crate::paths::{Layout, Scope};
use crate::utils::path::write_output;

#[derive(Debug, Default)]
pub struct GridInvoker;

impl GridInvoker {
    pub const fn new() -> Self {
        Self
    }

    /// `<vendor source>/<filename>.scss`
    pub fn output_path(layout: &Layout, grid: &GridConfig) -> PathBuf {
        layout
            .source_root(Scope::Vendor)
            .join(format!("{}.scss", grid.filename))
    }
}

impl Invoker for GridInvoker {
    fn label(&self) -> String {
        "grid".to_owned()
    }

    fn module(&self) -> &'static str {
        "grid"
    }

    /// Always regenerated; the output depends on config only.
    fn build(&self, ctx: &BuildContext, _options: BuildOptions) -> Result<BuildReport> {
        let grid = &ctx.config.grid;
        let output = Self::output_path(&ctx.layout, grid);

        let mut report = BuildReport::new();
        match write_output(&output, render(grid)) {
            Ok(()) => {
                log!(self.module(); "{}", ctx.display(&output));
                report.record_built(output);
            }
            Err(err) => report.record_failed(&output, &err),
        }
        report.finish(&self.label(), ctx.mode)
    }
}

/// Render the mixin stylesheet.
pub fn render(grid: &GridConfig) -> String {
    let mut out = GridSheet(grid).to_string();
    out.truncate(out.trim_end().len());
    out.push('\n');
    out
}

struct GridSheet<'a>(&'a GridConfig);

impl fmt::Display for GridSheet<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = self.0;
        let columns = grid.columns.max(1);
        let offset = &grid.offset;
        let fields = &grid.container_fields;
        let half = format!("calc({offset} / 2)");
        let atom = format!("100% / {columns}");

        writeln!(out, "// Generated by `pave install` from [grid] in pave.toml.")?;
        writeln!(out, "// Changes here are overwritten on the next install.\n")?;

        writeln!(out, "$columns: {columns};")?;
        writeln!(out, "$offset: {offset};")?;
        writeln!(out, "$fields: {fields};")?;
        writeln!(out, "$container-max-width: {};\n", grid.container_max_width)?;

        writeln!(
            out,
            "@mixin {} {{\n  max-width: $container-max-width;\n  margin-left: auto;\n  \
             margin-right: auto;\n  padding-left: $fields;\n  padding-right: $fields;\n}}\n",
            grid.container_mixin
        )?;
        writeln!(
            out,
            "@mixin wrapper-full {{\n  padding-left: $fields;\n  padding-right: $fields;\n}}\n"
        )?;
        writeln!(
            out,
            "@mixin row-offsets {{\n  margin-left: calc({offset} / -2);\n  \
             margin-right: calc({offset} / -2);\n}}\n"
        )?;
        writeln!(
            out,
            "@mixin row-flex {{\n  display: flex;\n  flex-wrap: wrap;\n  @include row-offsets;\n}}\n"
        )?;
        writeln!(
            out,
            "@mixin col-offsets($type) {{\n  #{{$type}}-left: {half};\n  #{{$type}}-right: {half};\n}}\n"
        )?;
        writeln!(
            out,
            "@mixin col {{\n  box-sizing: border-box;\n  word-wrap: break-word;\n  \
             @include col-offsets(margin);\n}}\n"
        )?;
        writeln!(
            out,
            "@mixin size($n) {{\n  width: calc({atom} * #{{$n}} - {offset});\n}}\n"
        )?;
        writeln!(
            out,
            "@mixin shift($n) {{\n  margin-left: calc({atom} * #{{$n}} + {half});\n}}\n"
        )?;

        let feature = if grid.mobile_first { "min-width" } else { "max-width" };
        for bp in &grid.breakpoints {
            let name = &bp.name;
            writeln!(
                out,
                "@mixin {name}-block {{\n  @media screen and ({feature}: {}) {{\n    @content;\n  }}\n}}\n",
                bp.width
            )?;
            writeln!(
                out,
                "@mixin {name}($property, $value) {{\n  @include {name}-block {{\n    \
                 #{{$property}}: $value;\n  }}\n}}\n"
            )?;
            writeln!(
                out,
                "@mixin size-{name}($n) {{\n  @include {name}-block {{\n    @include size($n);\n  }}\n}}\n"
            )?;
            writeln!(
                out,
                "@mixin shift-{name}($n) {{\n  @include {name}-block {{\n    @include shift($n);\n  }}\n}}\n"
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use crate::engine::testing::context;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_render_defaults() {
        let grid = test_parse_config("").grid;
        let scss = render(&grid);

        assert!(scss.contains("$columns: 12;"));
        assert!(scss.contains("@mixin container {"));
        assert!(scss.contains("max-width: $container-max-width;"));
        assert!(scss.contains("@mixin size($n) {\n  width: calc(100% / 12 * #{$n} - 1.875rem);"));
        assert!(scss.contains("@media screen and (min-width: 48rem)"));
        assert!(scss.contains("@mixin size-xl($n)"));
        assert!(!scss.contains("max-width: 48rem"));
        assert!(scss.ends_with("}\n"));
    }

    #[test]
    fn test_render_desktop_first() {
        let grid = test_parse_config(
            r#"
[grid]
columns = 24
mobile_first = false
container_mixin = "wrapper"

[[grid.breakpoints]]
name = "tablet"
width = "60rem"
"#,
        )
        .grid;
        let scss = render(&grid);

        assert!(scss.contains("@mixin wrapper {"));
        assert!(scss.contains("100% / 24"));
        assert!(scss.contains("@mixin tablet-block {\n  @media screen and (max-width: 60rem)"));
        assert!(!scss.contains("@mixin md-block"));
    }

    #[test]
    fn test_breakpoint_order_kept() {
        let scss = render(&test_parse_config("").grid);
        let xs = scss.find("@mixin xs-block").unwrap();
        let md = scss.find("@mixin md-block").unwrap();
        let xl = scss.find("@mixin xl-block").unwrap();
        assert!(xs < md && md < xl);
    }

    #[test]
    fn test_build_writes_vendor_partial() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let ctx = context(root, "");

        let report = GridInvoker::new().build(&ctx, BuildOptions::default()).unwrap();

        let output = root.join("vendor/assets/_source/_smart-grid.scss");
        assert_eq!(report.built, vec![output.clone()]);
        assert!(fs::read_to_string(output).unwrap().contains("@mixin row-flex"));
    }
}
