//! `$PAVE_*` variables for external engine commands.
//!
//! | Variable          | Value                                  |
//! |-------------------|----------------------------------------|
//! | `PAVE_INPUT`      | Absolute source file                   |
//! | `PAVE_OUTPUT`     | Absolute destination file              |
//! | `PAVE_OUTPUT_DIR` | Destination folder                     |
//! | `PAVE_ROOT`       | Public root                            |
//! | `PAVE_MODE`       | `production` or `development`          |
//!
//! The same values are exported to the child's environment.

use rustc_hash::FxHashMap;

use crate::paths::BuildTarget;

pub type Vars = FxHashMap<String, String>;

pub fn target_vars(target: &BuildTarget, root: &std::path::Path, production: bool) -> Vars {
    let mut vars = FxHashMap::default();
    vars.insert("PAVE_INPUT".into(), target.input.to_string_lossy().into_owned());
    vars.insert("PAVE_OUTPUT".into(), target.output.to_string_lossy().into_owned());
    if let Some(dir) = target.output.parent() {
        vars.insert("PAVE_OUTPUT_DIR".into(), dir.to_string_lossy().into_owned());
    }
    vars.insert("PAVE_ROOT".into(), root.to_string_lossy().into_owned());
    vars.insert(
        "PAVE_MODE".into(),
        if production { "production" } else { "development" }.into(),
    );
    vars
}

/// Replace `$NAME` occurrences in each argument.
///
/// Longer names are substituted first so `$PAVE_OUTPUT_DIR` is never
/// consumed by `$PAVE_OUTPUT`.
pub fn resolve_args(args: &[String], vars: &Vars) -> Vec<String> {
    let mut keys: Vec<_> = vars.keys().collect();
    keys.sort_by_key(|k| std::cmp::Reverse(k.len()));

    args.iter()
        .map(|arg| {
            keys.iter().fold(arg.clone(), |acc, key| {
                acc.replace(&format!("${key}"), &vars[key.as_str()])
            })
        })
        .collect()
}
