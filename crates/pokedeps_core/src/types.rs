use std::path::PathBuf;

/// Dependency names declared by a single `package.json`, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub dependencies: Vec<String>,
    pub dev_dependencies: Vec<String>,
}

impl Manifest {
    /// Declared dependency names, optionally followed by dev-only ones.
    pub fn declared(&self, include_dev: bool) -> impl Iterator<Item = &str> {
        let dev: &[String] = if include_dev { &self.dev_dependencies } else { &[] };
        self.dependencies.iter().chain(dev.iter()).map(String::as_str)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("cannot read manifest {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse manifest {}: {source}", .path.display())]
    Unparsable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ManifestError {
    #[cfg(test)]
    pub(crate) fn path(&self) -> &PathBuf {
        match self {
            ManifestError::Unreadable { path, .. } | ManifestError::Unparsable { path, .. } => path,
        }
    }
}
