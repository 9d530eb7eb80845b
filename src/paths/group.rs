//! Asset groups and the folder layout they are derived from.
//!
//! ```text
//! <root>/<template>/
//! ├── assets/
//! │   ├── _source/          template styles and scripts
//! │   ├── style.css         built
//! │   └── js/main.js        built
//! ├── vendor/assets/
//! │   ├── _source/          vendor styles, scripts, grid mixins
//! │   └── jquery/           copied by `install`
//! └── images/
//!     ├── _high/            raw images
//!     └── banner.jpg        optimized
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use super::pattern::{GlobError, SourceSet, split_glob};
use super::route::{self, BuildTarget, RouteError};
use crate::config::{PipelineConfig, VendorPackage};

/// What an asset group produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Style,
    Script,
    Image,
    Vendor,
}

impl AssetKind {
    /// Extension of built files, `None` when the source extension is kept.
    pub const fn output_extension(self) -> Option<&'static str> {
        match self {
            Self::Style => Some("css"),
            Self::Script => Some("js"),
            Self::Image | Self::Vendor => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Style => "styles",
            Self::Script => "scripts",
            Self::Image => "images",
            Self::Vendor => "vendor",
        }
    }
}

/// Which asset root a group lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Template,
    Vendor,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Template => "template",
            Self::Vendor => "vendor",
        })
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Absolute folders of the source/output convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub root: PathBuf,
    pub template: PathBuf,
    pub assets: PathBuf,
    pub vendor: PathBuf,
    pub images: PathBuf,
    /// Source folder name, e.g. `_source`
    pub source: String,
    /// Raw image folder name, e.g. `_high`
    pub image_source: String,
}

impl Layout {
    pub fn new(config: &PipelineConfig) -> Self {
        let root = config.root.clone();
        let template = join_dir(&root, &config.layout.template);
        Self {
            assets: join_dir(&template, &config.layout.assets),
            vendor: join_dir(&template, &config.layout.vendor),
            images: join_dir(&template, &config.layout.images),
            source: config.layout.source.trim_matches('/').to_owned(),
            image_source: config.layout.image_source.trim_matches('/').to_owned(),
            template,
            root,
        }
    }

    /// Destination root of a scope (`assets/` or `vendor/assets/`).
    pub fn asset_root(&self, scope: Scope) -> &Path {
        match scope {
            Scope::Template => &self.assets,
            Scope::Vendor => &self.vendor,
        }
    }

    /// Source root of a scope (`assets/_source/`).
    pub fn source_root(&self, scope: Scope) -> PathBuf {
        self.asset_root(scope).join(&self.source)
    }

    /// Raw image root (`images/_high/`).
    pub fn image_source_root(&self) -> PathBuf {
        self.images.join(&self.image_source)
    }

    /// Destination folder of a vendor package (`vendor/assets/jquery/`).
    pub fn vendor_package_dir(&self, package: &VendorPackage) -> PathBuf {
        self.vendor.join(package.folder())
    }
}

fn join_dir(base: &Path, segment: &str) -> PathBuf {
    let segment = segment.trim_matches('/');
    if segment.is_empty() {
        base.to_path_buf()
    } else {
        base.join(segment)
    }
}

// ============================================================================
// AssetGroup
// ============================================================================

/// How a group maps a source file to its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Routing {
    /// Drop the named folder (`_source`, `_high`) from the path below `base`.
    StripSegment { base: PathBuf, segment: String },
    /// Keep the path relative to `from`, placed under `to`.
    Rebase { from: PathBuf, to: PathBuf },
}

/// A set of sources sharing one destination rule.
///
/// Source and destination are both derived from the [`Layout`], so a group
/// never writes outside its own destination subtree.
///
/// Patterns are relative to `source_root`, which stays a plain path.
#[derive(Debug, Clone)]
pub struct AssetGroup {
    pub kind: AssetKind,
    pub scope: Scope,
    pub source_root: PathBuf,
    /// Ordered patterns below `source_root`.
    patterns: Vec<String>,
    routing: Routing,
}

impl AssetGroup {
    /// Styles of a scope: `<asset_root>/_source/**/*.scss` without partials.
    pub fn styles(layout: &Layout, scope: Scope, extension: &str) -> Self {
        Self::compiled(layout, AssetKind::Style, scope, extension)
    }

    /// Script entries of a scope: `<asset_root>/_source/**/*.js` without partials.
    pub fn scripts(layout: &Layout, scope: Scope, extension: &str) -> Self {
        Self::compiled(layout, AssetKind::Script, scope, extension)
    }

    fn compiled(layout: &Layout, kind: AssetKind, scope: Scope, extension: &str) -> Self {
        Self {
            kind,
            scope,
            source_root: layout.source_root(scope),
            // partials first: a negation only filters the patterns after it
            patterns: vec![format!("!**/_{extension}"), format!("**/{extension}")],
            routing: Routing::StripSegment {
                base: layout.asset_root(scope).to_path_buf(),
                segment: layout.source.clone(),
            },
        }
    }

    /// Raw images: `images/_high/**/<ext>`.
    pub fn images(layout: &Layout, extension: &str) -> Self {
        Self {
            kind: AssetKind::Image,
            scope: Scope::Template,
            source_root: layout.image_source_root(),
            patterns: vec![format!("**/{extension}")],
            routing: Routing::StripSegment {
                base: layout.images.clone(),
                segment: layout.image_source.clone(),
            },
        }
    }

    /// Files of one vendor package, copied verbatim (partials included).
    ///
    /// `project_dir` anchors relative `src` globs such as `./node_modules/...`.
    /// Files keep their path relative to the glob's literal folder.
    pub fn vendor_package(layout: &Layout, package: &VendorPackage, project_dir: &Path) -> Self {
        let (literal, rest) = split_glob(package.src.trim_start_matches("./"));
        let from = project_dir.join(literal);

        Self {
            kind: AssetKind::Vendor,
            scope: Scope::Vendor,
            source_root: from.clone(),
            patterns: vec![rest],
            routing: Routing::Rebase {
                from,
                to: layout.vendor_package_dir(package),
            },
        }
    }

    /// Display label, e.g. `template styles`.
    pub fn label(&self) -> String {
        format!("{} {}", self.scope, self.kind.as_str())
    }

    /// Ordered patterns below `source_root`: the partial exclusion first,
    /// then the inclusive one.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn source_set(&self) -> Result<SourceSet, GlobError> {
        SourceSet::new(&self.source_root, &self.patterns)
    }

    /// Destination of `input` for this group.
    pub fn output_path(&self, input: &Path, minify: bool) -> Result<PathBuf, RouteError> {
        let mut output = match &self.routing {
            Routing::StripSegment { base, segment } => {
                let rel = input
                    .strip_prefix(base)
                    .map_err(|_| RouteError::OutsideBase {
                        path: input.to_path_buf(),
                        base: base.clone(),
                    })?;
                base.join(route::strip_segment(rel, segment)?)
            }
            Routing::Rebase { from, to } => route::rebase(input, from, to)?,
        };

        if let Some(ext) = self.kind.output_extension() {
            output = route::with_extension(&output, ext)?;
        }
        if minify {
            output = route::min_infix(&output)?;
        }
        Ok(output)
    }

    pub fn target(&self, input: &Path, minify: bool, force: bool) -> Result<BuildTarget, RouteError> {
        Ok(BuildTarget {
            input: input.to_path_buf(),
            output: self.output_path(input, minify)?,
            minify,
            force,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;

    fn layout() -> Layout {
        Layout::new(&test_config_at(Path::new("/site"), ""))
    }

    #[test]
    fn test_layout_defaults() {
        let layout = layout();
        assert_eq!(layout.assets, PathBuf::from("/site/assets"));
        assert_eq!(layout.vendor, PathBuf::from("/site/vendor/assets"));
        assert_eq!(layout.source_root(Scope::Template), PathBuf::from("/site/assets/_source"));
        assert_eq!(layout.image_source_root(), PathBuf::from("/site/images/_high"));
    }

    #[test]
    fn test_layout_with_template() {
        let layout = Layout::new(&test_config_at(Path::new("/site"), "[layout]\ntemplate = \"theme/\""));
        assert_eq!(layout.assets, PathBuf::from("/site/theme/assets"));
        assert_eq!(layout.images, PathBuf::from("/site/theme/images"));
        assert_eq!(layout.root, PathBuf::from("/site"));
    }

    #[test]
    fn test_style_patterns_exclude_first() {
        let group = AssetGroup::styles(&layout(), Scope::Template, "*.scss");
        assert_eq!(group.source_root, PathBuf::from("/site/assets/_source"));
        assert_eq!(group.patterns(), ["!**/_*.scss", "**/*.scss"]);
    }

    #[test]
    fn test_group_excludes_partials() {
        let set = AssetGroup::styles(&layout(), Scope::Vendor, "*.scss")
            .source_set()
            .unwrap();
        assert!(set.matches(Path::new("/site/vendor/assets/_source/vendor.scss")));
        assert!(!set.matches(Path::new("/site/vendor/assets/_source/_smart-grid.scss")));
    }

    #[test]
    fn test_script_output_paths() {
        let group = AssetGroup::scripts(&layout(), Scope::Template, "*.js");
        let input = Path::new("/site/assets/_source/js/main.js");

        assert_eq!(
            group.output_path(input, false).unwrap(),
            PathBuf::from("/site/assets/js/main.js")
        );
        assert_eq!(
            group.output_path(input, true).unwrap(),
            PathBuf::from("/site/assets/js/main.min.js")
        );
    }

    #[test]
    fn test_style_output_maps_extension() {
        let group = AssetGroup::styles(&layout(), Scope::Template, "*.scss");
        let input = Path::new("/site/assets/_source/style.scss");

        assert_eq!(
            group.output_path(input, false).unwrap(),
            PathBuf::from("/site/assets/style.css")
        );
        assert_eq!(
            group.output_path(input, true).unwrap(),
            PathBuf::from("/site/assets/style.min.css")
        );
    }

    #[test]
    fn test_min_named_source_keeps_both_outputs() {
        let group = AssetGroup::scripts(&layout(), Scope::Vendor, "*.js");
        let input = Path::new("/site/vendor/assets/_source/lib.min.js");

        let plain = group.output_path(input, false).unwrap();
        let minified = group.output_path(input, true).unwrap();
        assert_eq!(plain, PathBuf::from("/site/vendor/assets/lib.min.js"));
        assert_eq!(minified, PathBuf::from("/site/vendor/assets/lib.min.min.js"));
    }

    #[test]
    fn test_output_path_is_deterministic() {
        let group = AssetGroup::styles(&layout(), Scope::Vendor, "*.scss");
        let input = Path::new("/site/vendor/assets/_source/blocks/card.scss");
        let first = group.output_path(input, true).unwrap();
        let second = group.output_path(input, true).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, PathBuf::from("/site/vendor/assets/blocks/card.min.css"));
    }

    #[test]
    fn test_segment_above_root_is_ignored() {
        let layout = Layout::new(&test_config_at(Path::new("/home/_source/site"), ""));
        let group = AssetGroup::scripts(&layout, Scope::Template, "*.js");
        assert_eq!(
            group
                .output_path(Path::new("/home/_source/site/assets/_source/a.js"), false)
                .unwrap(),
            PathBuf::from("/home/_source/site/assets/a.js")
        );
    }

    #[test]
    fn test_image_output_path() {
        let group = AssetGroup::images(&layout(), "*.{jpg,png}");
        assert_eq!(
            group.output_path(Path::new("/site/images/_high/banner.jpg"), false).unwrap(),
            PathBuf::from("/site/images/banner.jpg")
        );
        assert_eq!(
            group.output_path(Path::new("/site/images/_high/team/a.png"), false).unwrap(),
            PathBuf::from("/site/images/team/a.png")
        );
    }

    #[test]
    fn test_missing_segment_is_error() {
        let group = AssetGroup::scripts(&layout(), Scope::Template, "*.js");
        let err = group.output_path(Path::new("/site/assets/js/main.js"), false);
        assert!(matches!(err, Err(RouteError::MissingSegment { .. })));
    }

    #[test]
    fn test_vendor_package_routing() {
        let package = VendorPackage {
            name: "Jquery".into(),
            src: "./node_modules/jquery/dist/**/*.*".into(),
        };
        let group = AssetGroup::vendor_package(&layout(), &package, Path::new("/site"));

        assert_eq!(group.patterns(), ["**/*.*"]);
        assert_eq!(group.source_root, PathBuf::from("/site/node_modules/jquery/dist"));
        assert_eq!(
            group
                .output_path(Path::new("/site/node_modules/jquery/dist/jquery.min.js"), false)
                .unwrap(),
            PathBuf::from("/site/vendor/assets/jquery/jquery.min.js")
        );
    }

    #[test]
    fn test_vendor_package_keeps_partials() {
        let package = VendorPackage {
            name: "Slick".into(),
            src: "node_modules/slick-carousel/slick/**/*.*".into(),
        };
        let set = AssetGroup::vendor_package(&layout(), &package, Path::new("/site"))
            .source_set()
            .unwrap();
        assert!(set.matches(Path::new("/site/node_modules/slick-carousel/slick/_theme.scss")));
    }

    #[test]
    fn test_root_with_glob_characters() {
        let layout = Layout::new(&test_config_at(Path::new("/srv/site{v2}"), ""));
        let set = AssetGroup::scripts(&layout, Scope::Template, "*.js")
            .source_set()
            .unwrap();
        assert!(set.matches(Path::new("/srv/site{v2}/assets/_source/main.js")));
        assert!(!set.matches(Path::new("/srv/sitev2/assets/_source/main.js")));
        assert_eq!(set.roots(), vec![PathBuf::from("/srv/site{v2}/assets/_source")]);
    }
}
