//! The standard task graph, built once at startup.
//!
//! | Task                                            | Composition                         |
//! |-------------------------------------------------|-------------------------------------|
//! | `build:template:styles`, `build:vendor:styles`  | leaf                                |
//! | `build:template:scripts`, `build:vendor:scripts`| leaf                                |
//! | `build::styles`                                 | parallel(template, vendor styles)   |
//! | `build::scripts`                                | parallel(template, vendor scripts)  |
//! | `build::images`                                 | leaf, forced in production          |
//! | `rebuild::images`                               | leaf, always forced                 |
//! | `install`                                       | parallel(grid, vendor copy)         |
//! | `build`                                         | parallel(styles, scripts, images)   |
//! | `watch:images`                                  | series(`build::images`)             |
//! | `watch`, `default`                              | long-running, see `crate::watch`    |

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::node::TaskNode;
use crate::cli::TaskName;
use crate::config::PipelineConfig;
use crate::engine::{
    BuildOptions, GridInvoker, ImagesInvoker, Invoker, ScriptsInvoker, StylesInvoker, VendorInvoker,
};
use crate::paths::{Layout, Scope};

/// What the CLI task resolves to.
pub enum Plan {
    /// A finite build.
    Run(Arc<TaskNode>),
    /// Watch sources until shutdown, optionally next to the dev server.
    Watch { serve: bool },
}

pub struct TaskGraph {
    nodes: FxHashMap<String, Arc<TaskNode>>,
}

impl TaskGraph {
    pub fn new(config: &PipelineConfig) -> Self {
        let layout = Layout::new(config);
        let production = config.production;
        let mut graph = Self {
            nodes: FxHashMap::default(),
        };

        // Styles and scripts: minified then plain, both forced, in production.
        let compiled = if production {
            vec![BuildOptions::new(true, true), BuildOptions::new(false, true)]
        } else {
            vec![BuildOptions::new(false, false)]
        };
        let single = vec![BuildOptions::new(false, production)];

        let compiled_leaf = |graph: &mut Self, name: &str, invoker: Arc<dyn Invoker>| {
            graph.insert(TaskNode::leaf(name, invoker, compiled.clone()))
        };

        let styles_ext = &config.styles.extension;
        let scripts_ext = &config.scripts.extension;
        let template_styles = compiled_leaf(
            &mut graph,
            "build:template:styles",
            Arc::new(StylesInvoker::new(&layout, Scope::Template, styles_ext)),
        );
        let vendor_styles = compiled_leaf(
            &mut graph,
            "build:vendor:styles",
            Arc::new(StylesInvoker::new(&layout, Scope::Vendor, styles_ext)),
        );
        let template_scripts = compiled_leaf(
            &mut graph,
            "build:template:scripts",
            Arc::new(ScriptsInvoker::new(&layout, Scope::Template, scripts_ext)),
        );
        let vendor_scripts = compiled_leaf(
            &mut graph,
            "build:vendor:scripts",
            Arc::new(ScriptsInvoker::new(&layout, Scope::Vendor, scripts_ext)),
        );

        let images: Arc<dyn Invoker> = Arc::new(ImagesInvoker::new(&layout, &config.images.extension));
        let build_images = graph.insert(TaskNode::leaf("build::images", images.clone(), single.clone()));
        graph.insert(TaskNode::leaf(
            "rebuild::images",
            images,
            vec![BuildOptions::new(false, true)],
        ));

        let styles = graph.insert(TaskNode::parallel(
            "build::styles",
            vec![template_styles, vendor_styles],
        ));
        let scripts = graph.insert(TaskNode::parallel(
            "build::scripts",
            vec![template_scripts, vendor_scripts],
        ));
        graph.insert(TaskNode::parallel("build", vec![styles, scripts, build_images.clone()]));
        // raw image changes rebuild one after another, never overlapping
        graph.insert(TaskNode::sequential("watch:images", vec![build_images]));

        let grid = graph.insert(TaskNode::leaf(
            "install:grid",
            Arc::new(GridInvoker::new()),
            single.clone(),
        ));
        let vendor = graph.insert(TaskNode::leaf(
            "install:vendor",
            Arc::new(VendorInvoker::new()),
            single,
        ));
        graph.insert(TaskNode::parallel("install", vec![grid, vendor]));

        graph
    }

    fn insert(&mut self, node: TaskNode) -> Arc<TaskNode> {
        let node = Arc::new(node);
        self.nodes.insert(node.name.clone(), node.clone());
        node
    }

    /// Node by task name, e.g. `build::styles` or `build:vendor:scripts`.
    pub fn get(&self, name: &str) -> Option<Arc<TaskNode>> {
        self.nodes.get(name).cloned()
    }

    /// Resolve a CLI task.
    pub fn plan(&self, task: TaskName) -> Option<Plan> {
        match task {
            TaskName::Watch => Some(Plan::Watch { serve: false }),
            TaskName::Default => Some(Plan::Watch { serve: true }),
            _ => self.get(task.as_str()).map(Plan::Run),
        }
    }
}
