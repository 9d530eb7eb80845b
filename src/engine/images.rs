//! Image invoker: re-encode raw images from `images/_high/`.
//!
//! | Format     | Optimization                                  |
//! |------------|-----------------------------------------------|
//! | JPEG       | decode, re-encode at `images.jpeg_quality`    |
//! | PNG        | re-encode, best compression, adaptive filter  |
//! | SVG        | usvg parse and compact write (`svg`)          |
//! | SVG + text | copied                                        |
//! | GIF, other | copied                                        |
//!
//! Whichever of optimized and original is smaller gets written.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageFormat};

use super::svg::minify_svg;
use super::{BuildContext, BuildOptions, BuildReport, Invoker, plan_targets, run_targets};
use crate::logger::ProgressLine;
use crate::paths::{AssetGroup, BuildTarget, Layout};
use crate::utils::path::write_output;

pub struct ImagesInvoker {
    group: AssetGroup,
}

impl ImagesInvoker {
    pub fn new(layout: &Layout, extension: &str) -> Self {
        Self {
            group: AssetGroup::images(layout, extension),
        }
    }
}

impl Invoker for ImagesInvoker {
    fn label(&self) -> String {
        "images".to_owned()
    }

    fn module(&self) -> &'static str {
        "images"
    }

    fn build(&self, ctx: &BuildContext, options: BuildOptions) -> Result<BuildReport> {
        let mut report = BuildReport::new();
        // Images are never minified by name.
        let options = BuildOptions {
            minify: false,
            ..options
        };
        let targets = plan_targets(&self.group, options, &mut report)?;

        if !targets.is_empty() {
            let quality = ctx.config.images.jpeg_quality;
            let progress = ProgressLine::new(&[("images", targets.len())]);
            run_targets(ctx, self.module(), &targets, &mut report, |target| {
                let result = optimize_file(target, quality);
                progress.inc("images");
                result
            });
            progress.finish();
        }

        report.finish(&self.label(), ctx.mode)
    }
}

fn optimize_file(target: &BuildTarget, quality: u8) -> Result<()> {
    let original = fs::read(&target.input)
        .with_context(|| format!("Failed to read {}", target.input.display()))?;

    let optimized = optimize(&target.input, &original, quality)
        .with_context(|| format!("Failed to optimize {}", target.input.display()))?;

    match optimized {
        Some(bytes) if bytes.len() < original.len() => write_output(&target.output, bytes),
        _ => write_output(&target.output, &original),
    }
}

/// Optimized bytes, `None` for formats that are copied as-is.
fn optimize(path: &Path, data: &[u8], quality: u8) -> Result<Option<Vec<u8>>> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    let bytes = match ext.as_str() {
        "jpg" | "jpeg" => {
            let img = image::load_from_memory_with_format(data, ImageFormat::Jpeg)?;
            let mut buf = Vec::new();
            DynamicImage::ImageRgb8(img.to_rgb8())
                .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))?;
            buf
        }
        "png" => {
            let img = image::load_from_memory_with_format(data, ImageFormat::Png)?;
            let mut buf = Vec::new();
            img.write_with_encoder(PngEncoder::new_with_quality(
                &mut buf,
                CompressionType::Best,
                FilterType::Adaptive,
            ))?;
            buf
        }
        "svg" => return minify_svg(data),
        _ => return Ok(None),
    };
    Ok(Some(bytes))
}
