//! Path resolution: folder layout, glob pattern lists and output routing.
//!
//! - [`group`]: [`Layout`] and [`AssetGroup`], the source/destination pairs
//! - [`pattern`]: [`SourceSet`], ordered inclusive/negated pattern lists
//! - [`route`]: pure source → destination mapping ([`BuildTarget`])

mod group;
mod pattern;
mod route;

pub use group::{AssetGroup, Layout, Scope};
pub use pattern::SourceSet;
pub use route::BuildTarget;
