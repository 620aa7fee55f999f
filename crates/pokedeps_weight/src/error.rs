use std::{
    io,
    path::{Path, PathBuf},
};

use pokedeps_core::ManifestError;

/// Fatal conditions of a weight analysis run.
///
/// Unresolved dependencies are not errors: they are collected in the
/// graph's missing set and reported at the end of a successful run.
#[derive(Debug, thiserror::Error)]
pub enum WeightError {
    #[error("{0}")]
    ConfigurationConflict(String),

    #[error("Target directory {} does not exist or does not have a package.json", manifest_dir(.path))]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a valid package.json: {source}", .path.display())]
    ManifestUnparsable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("module not found: {0}")]
    ModuleNotFound(String),

    #[error("The path {} does not exist. Cannot create a graph there.", .0.display())]
    OutputPathInvalid(PathBuf),

    #[error("graph rendering failed: {0}")]
    RenderFailed(String),
}

impl From<ManifestError> for WeightError {
    fn from(err: ManifestError) -> Self {
        match err {
            ManifestError::Unreadable { path, source } => {
                WeightError::ManifestUnreadable { path, source }
            }
            ManifestError::Unparsable { path, source } => {
                WeightError::ManifestUnparsable { path, source }
            }
        }
    }
}

fn manifest_dir(manifest: &Path) -> String {
    manifest.parent().unwrap_or(manifest).display().to_string()
}
