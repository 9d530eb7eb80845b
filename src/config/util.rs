//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory.
///
/// # Example
/// ```text
/// /home/user/site/assets/_source/  ← cwd
/// /home/user/site/pave.toml        ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_from(&cwd, config_name)
}

fn find_config_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_parent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("assets/_source/js");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("pave.toml"), "").unwrap();

        let found = find_config_from(&nested, Path::new("pave.toml")).unwrap();
        assert_eq!(found, dir.path().join("pave.toml"));
    }

    #[test]
    fn test_find_config_ignores_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("pave.toml")).unwrap();
        let found = find_config_from(dir.path(), Path::new("pave.toml"));
        assert!(found.is_none_or(|p| p != dir.path().join("pave.toml")));
    }

    #[test]
    fn test_find_config_absolute_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(find_config_from(dir.path(), &missing).is_none());
    }
}
