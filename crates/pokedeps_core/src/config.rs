use anyhow::{Result, anyhow};
use log::{debug, trace};
use path_clean::clean;
use std::{
    env,
    path::{Path, PathBuf},
};

use crate::constants::NODE_MODULES_DIR;

/// Resolves the directory to analyze into an absolute, cleaned path,
/// defaulting to the current working directory.
pub fn resolve_project_root(path: Option<&Path>) -> Result<PathBuf> {
    let root = match path {
        Some(p) => resolve_path(p)?,
        None => clean(env::current_dir()?),
    };
    debug!("Resolved project root to {}", root.display());
    Ok(root)
}

/// Makes `path` absolute against the current working directory and removes
/// `.` and `..` components.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(clean(path));
    }
    let cwd = env::current_dir()?;
    trace!("Resolving {:?} from {:?}", path, cwd);
    Ok(clean(cwd.join(path)))
}

/// Base name of the project directory, used as the root module's name.
pub fn project_name(root: &Path) -> Result<String> {
    root.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| anyhow!("Cannot derive a project name from {}", root.display()))
}

pub fn node_modules_dir(root: &Path) -> PathBuf {
    root.join(NODE_MODULES_DIR)
}

/// Install directory of `name`. Scoped names (`@scope/pkg`) map onto the
/// nested scope directory.
pub fn module_dir(root: &Path, name: &str) -> PathBuf {
    node_modules_dir(root).join(name)
}
