//! Shared helpers: external processes and filesystem paths.

pub mod exec;
pub mod path;
