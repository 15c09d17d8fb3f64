// src/output.rs

//! Recipe persistence
//!
//! Recipes are written to a temp file in the destination directory and
//! renamed into place, so a reader never sees a half-written recipe.

use crate::error::{Error, Result};
use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Permissions for saved recipes
pub const RECIPE_MODE: u32 = 0o644;

/// Write `content` to `path` atomically with mode 0644
pub fn write_recipe(path: &Path, content: &str) -> Result<()> {
    let wrap = |source: std::io::Error| Error::WriteError {
        path: path.display().to_string(),
        source,
    };

    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent).map_err(wrap)?;
    temp.write_all(content.as_bytes()).map_err(wrap)?;
    temp.as_file().sync_all().map_err(wrap)?;
    fs::set_permissions(temp.path(), fs::Permissions::from_mode(RECIPE_MODE)).map_err(wrap)?;
    temp.persist(path).map_err(|e| wrap(e.error))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
