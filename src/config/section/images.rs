//! `[images]` section configuration.
//!
//! ```toml
//! [images]
//! extension = "*.{jpg,jpeg,png,gif,svg,JPG,JPEG,PNG,GIF,SVG}"
//! jpeg_quality = 90
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Glob for raw images, brace alternation allowed.
    pub extension: String,
    /// JPEG re-encode quality (1-100).
    pub jpeg_quality: u8,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            extension: "*.{jpg,jpeg,png,gif,svg,JPG,JPEG,PNG,GIF,SVG}".into(),
            jpeg_quality: 90,
        }
    }
}

impl ImagesConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !(1..=100).contains(&self.jpeg_quality) {
            diag.error(
                FieldPath::new("images.jpeg_quality"),
                format!("quality must be within 1..=100, got {}", self.jpeg_quality),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_images_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.images.jpeg_quality, 90);
        assert!(config.images.extension.contains("{jpg,"));
    }

    #[test]
    fn test_images_quality_range() {
        let config = test_parse_config("[images]\njpeg_quality = 0");
        let mut diag = ConfigDiagnostics::new();
        config.images.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
