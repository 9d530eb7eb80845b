//! Freshness detection: modification times decide whether a file rebuilds.

mod mtime;

pub use mtime::check;
