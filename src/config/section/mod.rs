//! Configuration section definitions.
//!
//! Each module corresponds to a section in `pave.toml`:
//!
//! | Module    | TOML Section | Purpose                                   |
//! |-----------|--------------|-------------------------------------------|
//! | `layout`  | `[layout]`   | Folder names of the source/output layout  |
//! | `styles`  | `[styles]`   | Sass command, include paths, targets      |
//! | `scripts` | `[scripts]`  | Bundler command and arguments             |
//! | `images`  | `[images]`   | Raw image extensions, encoder quality     |
//! | `vendor`  | `[vendor]`   | Vendor packages copied by `install`       |
//! | `grid`    | `[grid]`     | Grid mixins generated by `install`        |
//! | `serve`   | `[serve]`    | Dev server command, port, proxy           |

mod grid;
mod images;
mod layout;
mod scripts;
mod serve;
mod styles;
mod vendor;

pub use grid::{Breakpoint, GridConfig};
pub use images::ImagesConfig;
pub use layout::LayoutConfig;
pub use scripts::ScriptsConfig;
pub use serve::ServeConfig;
pub use styles::StylesConfig;
pub use vendor::{VendorConfig, VendorPackage};

use super::{ConfigDiagnostics, FieldPath};

/// Package runners that fetch the real tool on demand.
const PACKAGE_RUNNERS: &[&str] = &["npx", "bunx", "pnpx", "yarn", "dlx"];

/// Check that an external engine command is configured and installed.
pub(crate) fn validate_command(command: &[String], field: FieldPath, diag: &mut ConfigDiagnostics) {
    let Some(program) = command.first() else {
        diag.error(field, format!("{field} is empty"));
        return;
    };

    if which::which(program).is_ok() {
        return;
    }

    if PACKAGE_RUNNERS.contains(&program.as_str()) {
        if let Some(package) = command.get(1) {
            diag.hint(
                field,
                format!("`{package}` via `{program}`, ensure the package is installed"),
            );
        }
    } else {
        diag.error_with_hint(
            field,
            format!("`{program}` not found"),
            format!("install the command or update {field}"),
        );
    }
}

/// Check that a layout segment is a single relative folder name.
pub(crate) fn validate_segment(value: &str, field: FieldPath, diag: &mut ConfigDiagnostics) {
    let trimmed = value.trim_matches('/');
    if trimmed.is_empty() {
        diag.error(field, format!("{field} must not be empty"));
    } else if trimmed.contains('/') || trimmed == "." || trimmed == ".." {
        diag.error_with_hint(
            field,
            format!("{field} must be a single folder name, got `{value}`"),
            "nested folders are expressed through `layout.template`",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_command_empty() {
        let mut diag = ConfigDiagnostics::new();
        validate_command(&[], FieldPath::new("styles.command"), &mut diag);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_validate_command_missing_program() {
        let mut diag = ConfigDiagnostics::new();
        validate_command(
            &["pave-definitely-not-installed".into()],
            FieldPath::new("scripts.command"),
            &mut diag,
        );
        assert_eq!(diag.len(), 1);
        assert!(diag.errors()[0].hint.is_some());
    }

    #[test]
    fn test_validate_segment() {
        let mut diag = ConfigDiagnostics::new();
        validate_segment("_source/", FieldPath::new("layout.source"), &mut diag);
        assert!(diag.is_empty());

        validate_segment("/", FieldPath::new("layout.source"), &mut diag);
        validate_segment("a/b/", FieldPath::new("layout.image_source"), &mut diag);
        validate_segment("..", FieldPath::new("layout.source"), &mut diag);
        assert_eq!(diag.len(), 3);
    }
}
