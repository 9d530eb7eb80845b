//! `[vendor]` section configuration.
//!
//! Packages copied into `<root>/<template>/<vendor>/<name>/` by `install`.
//! The glob's literal prefix is stripped, so `node_modules/jquery/dist/**/*.*`
//! copies `dist/jquery.js` to `vendor/assets/jquery/jquery.js`.
//!
//! ```toml
//! [vendor]
//! force = true
//!
//! [[vendor.packages]]
//! name = "Jquery"
//! src = "./node_modules/jquery/dist/**/*.*"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorConfig {
    /// Copy even when the destination is newer.
    pub force: bool,
    pub packages: Vec<VendorPackage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorPackage {
    pub name: String,
    pub src: String,
}

impl VendorPackage {
    fn new(name: &str, src: &str) -> Self {
        Self {
            name: name.into(),
            src: src.into(),
        }
    }

    /// Destination folder name.
    pub fn folder(&self) -> String {
        self.name.to_lowercase()
    }
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            force: true,
            packages: vec![
                VendorPackage::new("Jquery", "./node_modules/jquery/dist/**/*.*"),
                VendorPackage::new("Bootstrap", "./node_modules/bootstrap/dist/js/*.*"),
                VendorPackage::new("Slick", "./node_modules/slick-carousel/slick/**/*.*"),
                VendorPackage::new("Fancybox", "./node_modules/@fancyapps/fancybox/dist/**/*.*"),
                VendorPackage::new("Waypoints", "./node_modules/waypoints/lib/**/*.*"),
            ],
        }
    }
}

impl VendorConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let field = FieldPath::new("vendor.packages");
        let mut seen = rustc_hash::FxHashSet::default();

        for package in &self.packages {
            if package.name.trim().is_empty() {
                diag.error(field, format!("package with src `{}` has no name", package.src));
                continue;
            }
            if package.name.contains(['/', '\\']) {
                diag.error(field, format!("package name `{}` must not contain a path separator", package.name));
            }
            if !seen.insert(package.folder()) {
                diag.error_with_hint(
                    field,
                    format!("duplicate package `{}`", package.name),
                    "names are compared case-insensitively",
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_vendor_defaults() {
        let config = test_parse_config("");
        assert!(config.vendor.force);
        assert_eq!(config.vendor.packages.len(), 5);
        assert_eq!(config.vendor.packages[0].folder(), "jquery");
    }

    #[test]
    fn test_vendor_packages_replace_defaults() {
        let config = test_parse_config(
            r#"
[[vendor.packages]]
name = "Swiper"
src = "./node_modules/swiper/*.js"
"#,
        );
        assert_eq!(config.vendor.packages.len(), 1);
        assert_eq!(config.vendor.packages[0].folder(), "swiper");
    }

    #[test]
    fn test_vendor_duplicate_names() {
        let config = test_parse_config(
            r#"
[[vendor.packages]]
name = "Slick"
src = "a/*.js"

[[vendor.packages]]
name = "slick"
src = "b/*.js"
"#,
        );
        let mut diag = ConfigDiagnostics::new();
        config.vendor.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}
