//! `[layout]` section configuration.
//!
//! Folder names that make up the source/output convention. Every asset
//! group derives both its source and destination from these values, so they
//! are never configured per group.
//!
//! # Example
//!
//! ```toml
//! [layout]
//! root = "./"                 # public folder (relative to pave.toml)
//! template = ""               # template folder inside root
//! source = "_source/"         # marks source trees
//! image_source = "_high/"     # marks raw image trees
//! assets = "assets/"          # template asset root
//! vendor = "vendor/assets/"   # vendor asset root
//! images = "images/"          # public image folder
//! markup = "**/*.html"        # pages that trigger a reload
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::validate_segment;
use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub root: PathBuf,
    pub template: String,
    pub source: String,
    pub image_source: String,
    pub assets: String,
    pub vendor: String,
    pub images: String,
    pub markup: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./"),
            template: String::new(),
            source: "_source/".into(),
            image_source: "_high/".into(),
            assets: "assets/".into(),
            vendor: "vendor/assets/".into(),
            images: "images/".into(),
            markup: "**/*.html".into(),
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        validate_segment(&self.source, FieldPath::new("layout.source"), diag);
        validate_segment(
            &self.image_source,
            FieldPath::new("layout.image_source"),
            diag,
        );

        if self.assets.trim_matches('/').is_empty() {
            diag.error(
                FieldPath::new("layout.assets"),
                "asset root must not be empty",
            );
        }
        if self.vendor.trim_matches('/').is_empty() {
            diag.error(
                FieldPath::new("layout.vendor"),
                "vendor root must not be empty",
            );
        }
        if self.assets.trim_matches('/') == self.vendor.trim_matches('/') {
            diag.error_with_hint(
                FieldPath::new("layout.vendor"),
                "template and vendor asset roots overlap",
                "each group needs its own destination tree",
            );
        }
    }
}
