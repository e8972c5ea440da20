//! Content loaders for reading game data from files.
//!
//! Every loader offers `load(path)` for files on disk and `parse(str)` for
//! in-memory content such as the built-in catalogue.

pub mod config;
pub mod templates;

pub use config::ConfigLoader;
pub use templates::{Catalogue, TemplateLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
