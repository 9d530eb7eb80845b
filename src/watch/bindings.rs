//! Which task a changed file re-triggers.
//!
//! | Files                               | Action                  |
//! |-------------------------------------|-------------------------|
//! | `layout.markup` (`**/*.html`)       | reload only             |
//! | template / vendor styles            | the style leaf          |
//! | template / vendor scripts           | the script leaf         |
//! | raw images                          | `watch:images`          |
//!
//! Matching uses each group's inclusive patterns only, so editing a partial
//! rebuilds the entries that import it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::engine::BuildContext;
use crate::paths::{AssetGroup, Scope, SourceSet};
use crate::task::{TaskGraph, TaskNode};

pub enum Action {
    Reload,
    Run(Arc<TaskNode>),
}

pub struct Binding {
    pub name: String,
    set: SourceSet,
    pub action: Action,
}

impl Binding {
    pub fn matches(&self, path: &Path) -> bool {
        self.set.matches(path)
    }
}

pub struct Bindings(Vec<Binding>);

impl Bindings {
    pub fn new(ctx: &BuildContext, graph: &TaskGraph) -> Result<Self> {
        let layout = &ctx.layout;
        let config = &ctx.config;
        let mut bindings = Vec::new();

        let markup = config.layout.markup.trim_start_matches("./");
        bindings.push(Binding {
            name: "markup".into(),
            set: SourceSet::new(&layout.root, &[markup])?,
            action: Action::Reload,
        });

        let groups = [
            (
                "build:template:styles",
                AssetGroup::styles(layout, Scope::Template, &config.styles.extension),
            ),
            (
                "build:vendor:styles",
                AssetGroup::styles(layout, Scope::Vendor, &config.styles.extension),
            ),
            (
                "build:template:scripts",
                AssetGroup::scripts(layout, Scope::Template, &config.scripts.extension),
            ),
            (
                "build:vendor:scripts",
                AssetGroup::scripts(layout, Scope::Vendor, &config.scripts.extension),
            ),
            ("watch:images", AssetGroup::images(layout, &config.images.extension)),
        ];

        for (task, group) in groups {
            let node = graph
                .get(task)
                .with_context(|| format!("task `{task}` is not registered"))?;
            bindings.push(Binding {
                name: task.to_owned(),
                set: group.source_set()?.inclusive(),
                action: Action::Run(node),
            });
        }

        Ok(Self(bindings))
    }

    /// Bindings hit by any of `paths`, each once, in registration order.
    pub fn matching<'a, P: AsRef<Path>>(&'a self, paths: &[P]) -> Vec<&'a Binding> {
        self.0
            .iter()
            .filter(|binding| paths.iter().any(|p| binding.matches(p.as_ref())))
            .collect()
    }

    /// Folders to watch recursively: existing literal roots, nested ones
    /// folded into their ancestors.
    pub fn watch_roots(&self) -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = self
            .0
            .iter()
            .flat_map(|b| b.set.roots())
            .filter(|root| root.is_dir())
            .collect();
        roots.sort();
        roots.dedup();

        let mut folded: Vec<PathBuf> = Vec::new();
        for root in roots {
            if !folded.iter().any(|kept| root.starts_with(kept)) {
                folded.push(root);
            }
        }
        folded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::context;
    use std::fs;
    use tempfile::TempDir;

    fn names(bindings: &[&Binding]) -> Vec<String> {
        bindings.iter().map(|b| b.name.clone()).collect()
    }

    fn setup(dir: &TempDir) -> (BuildContext, Bindings) {
        let ctx = context(dir.path(), "");
        let graph = TaskGraph::new(&ctx.config);
        let bindings = Bindings::new(&ctx, &graph).unwrap();
        (ctx, bindings)
    }

    #[test]
    fn test_partial_triggers_its_group() {
        let dir = TempDir::new().unwrap();
        let (_, bindings) = setup(&dir);
        let root = dir.path();

        let hit = bindings.matching(&[root.join("assets/_source/_vars.scss")]);
        assert_eq!(names(&hit), vec!["build:template:styles"]);

        let hit = bindings.matching(&[root.join("vendor/assets/_source/_smart-grid.scss")]);
        assert_eq!(names(&hit), vec!["build:vendor:styles"]);
    }

    #[test]
    fn test_actions_by_kind() {
        let dir = TempDir::new().unwrap();
        let (_, bindings) = setup(&dir);
        let root = dir.path();

        let hit = bindings.matching(&[
            root.join("index.html"),
            root.join("assets/_source/js/main.js"),
            root.join("images/_high/team/photo.JPG"),
            root.join("assets/_source/js/other.js"),
        ]);
        assert_eq!(
            names(&hit),
            vec!["markup", "build:template:scripts", "watch:images"]
        );
        assert!(matches!(hit[0].action, Action::Reload));
        assert!(matches!(&hit[1].action, Action::Run(node) if node.name == "build:template:scripts"));
    }

    #[test]
    fn test_outputs_do_not_trigger() {
        let dir = TempDir::new().unwrap();
        let (_, bindings) = setup(&dir);
        let root = dir.path();

        let hit = bindings.matching(&[
            root.join("assets/style.css"),
            root.join("assets/js/main.min.js"),
            root.join("images/banner.jpg"),
        ]);
        assert!(hit.is_empty());
    }

    #[test]
    fn test_root_with_glob_characters() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("site{v2}");
        fs::create_dir_all(&site).unwrap();
        let ctx = context(&site, "");
        let graph = TaskGraph::new(&ctx.config);
        let bindings = Bindings::new(&ctx, &graph).unwrap();
        let root = &ctx.layout.root;

        let hit = bindings.matching(&[root.join("index.html"), root.join("assets/_source/main.js")]);
        assert_eq!(names(&hit), vec!["markup", "build:template:scripts"]);
        assert_eq!(bindings.watch_roots(), vec![root.clone()]);
    }

    #[test]
    fn test_watch_roots_folded() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("assets/_source")).unwrap();
        let (ctx, bindings) = setup(&dir);

        // the markup pattern walks the whole root, which covers every group
        assert_eq!(bindings.watch_roots(), vec![ctx.layout.root.clone()]);
    }

    #[test]
    fn test_watch_roots_skip_missing() {
        let dir = TempDir::new().unwrap();
        let ctx = context(dir.path(), "[layout]\nmarkup = \"pages/**/*.html\"");
        fs::create_dir_all(dir.path().join("assets/_source")).unwrap();
        let graph = TaskGraph::new(&ctx.config);
        let bindings = Bindings::new(&ctx, &graph).unwrap();

        assert_eq!(
            bindings.watch_roots(),
            vec![ctx.layout.root.join("assets/_source")]
        );
    }
}
