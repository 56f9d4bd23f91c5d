//! Locating the runtime executable.
use crate::error::{RcatError, Result};
use std::path::{Path, PathBuf};

/// Resolve `path` to an existing file.
///
/// Relative paths are taken against the current directory. A bare program
/// name (no separators) that is not present there is looked up on `PATH`.
/// Nothing is spawned here.
pub fn resolve_runtime(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(RcatError::RuntimeNotFound {
            path: PathBuf::new(),
        });
    }

    let absolute = absolutize(path);
    if absolute.is_file() {
        return Ok(absolute);
    }

    if is_bare_name(path) {
        if let Ok(found) = which::which(path) {
            return Ok(found);
        }
    }

    Err(RcatError::RuntimeNotFound { path: absolute })
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

fn is_bare_name(path: &Path) -> bool {
    path.components().count() == 1 && path.parent().map_or(true, |p| p.as_os_str().is_empty())
}
