use log::{debug, trace};
use serde::Deserialize;
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    constants::MANIFEST_FILE,
    types::{Manifest, ManifestError},
};

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    dependencies: Option<Value>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: Option<Value>,
}

/// Keys of a dependency section. Anything other than an object declares
/// nothing.
fn section_keys(section: Option<Value>) -> Vec<String> {
    match section {
        Some(Value::Object(map)) => map.into_iter().map(|(k, _)| k).collect(),
        Some(other) => {
            trace!("Ignoring non-object dependency section: {}", other);
            Vec::new()
        }
        None => Vec::new(),
    }
}

pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILE)
}

/// Reads `<dir>/package.json` and returns the declared dependency names.
///
/// Only the keys of `dependencies` and `devDependencies` are kept; version
/// ranges are ignored.
pub fn read_manifest(dir: &Path) -> Result<Manifest, ManifestError> {
    let path = manifest_path(dir);
    trace!("Reading manifest: {}", path.display());

    let content = fs::read_to_string(&path)
        .map_err(|source| ManifestError::Unreadable { path: path.clone(), source })?;

    let raw: RawManifest = serde_json::from_str(&content)
        .map_err(|source| ManifestError::Unparsable { path: path.clone(), source })?;

    let manifest = Manifest {
        dependencies: section_keys(raw.dependencies),
        dev_dependencies: section_keys(raw.dev_dependencies),
    };

    debug!(
        "Manifest {} declares {} dependencies and {} dev dependencies",
        path.display(),
        manifest.dependencies.len(),
        manifest.dev_dependencies.len()
    );
    Ok(manifest)
}
