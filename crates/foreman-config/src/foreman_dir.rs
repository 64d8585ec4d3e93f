//! Discovery and management of the `.foreman/` directory.
//!
//! The `.foreman/` directory is the root of a foreman project's metadata.
//! This module provides functions to find it by walking up the directory
//! tree, and to create it when initializing a new project.

use crate::config::ConfigError;
use std::path::{Path, PathBuf};

/// The name of the foreman metadata directory.
const FOREMAN_DIR_NAME: &str = ".foreman";

/// The name of the environment variable that can override the foreman directory.
const FOREMAN_DIR_ENV: &str = "FOREMAN_DIR";

/// Walk up the directory tree from `start` looking for a `.foreman/` directory.
///
/// Returns the path to the `.foreman/` directory if found, or `None` if the
/// filesystem root is reached without finding one. The `FOREMAN_DIR`
/// environment variable is checked first (highest priority).
///
/// # Examples
///
/// ```no_run
/// use foreman_config::foreman_dir::find_foreman_dir;
/// use std::path::Path;
///
/// if let Some(dir) = find_foreman_dir(Path::new(".")) {
///     println!("Found foreman dir at {}", dir.display());
/// }
/// ```
pub fn find_foreman_dir(start: &Path) -> Option<PathBuf> {
    // 1. Check FOREMAN_DIR environment variable (highest priority).
    if let Ok(env_dir) = std::env::var(FOREMAN_DIR_ENV) {
        let env_path = PathBuf::from(&env_dir);
        if env_path.is_dir() {
            return Some(env_path);
        }
    }

    // 2. Walk up from `start` looking for .foreman/.
    // Canonicalize the start path so we get absolute paths.
    let start = match start.canonicalize() {
        Ok(p) => p,
        Err(_) => return None,
    };

    let mut current = start.as_path();
    loop {
        let candidate = current.join(FOREMAN_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent;
            }
            _ => break, // Reached filesystem root.
        }
    }

    None
}

/// Walk up the directory tree looking for `.foreman/`, returning an error if
/// not found.
///
/// This is a convenience wrapper around [`find_foreman_dir`] that converts
/// `None` into [`ConfigError::ForemanDirNotFound`].
///
/// # Errors
///
/// Returns [`ConfigError::ForemanDirNotFound`] if no `.foreman/` directory
/// is found.
pub fn find_foreman_dir_or_error(start: &Path) -> Result<PathBuf, ConfigError> {
    find_foreman_dir(start).ok_or(ConfigError::ForemanDirNotFound)
}

/// Ensure a `.foreman/` directory exists at the given path.
///
/// If `path` itself is not called `.foreman`, the function creates a
/// `.foreman/` subdirectory under it. The directory (and any necessary
/// parents) is created if it does not exist.
///
/// Returns the path to the `.foreman/` directory.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] if directory creation fails.
pub fn ensure_foreman_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let foreman_dir = if path.ends_with(FOREMAN_DIR_NAME) {
        path.to_path_buf()
    } else {
        path.join(FOREMAN_DIR_NAME)
    };

    std::fs::create_dir_all(&foreman_dir)?;
    Ok(foreman_dir)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
