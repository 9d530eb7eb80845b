//! Path utilities.
//!
//! - [`fs`]: normalization and output writing (`normalize_path`, `write_output`)

pub mod fs;

pub use fs::{normalize_path, relative_display, write_output};
