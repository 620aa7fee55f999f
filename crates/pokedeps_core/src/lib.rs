//! Core utilities for pokedeps.
//!
//! This crate provides the filesystem-facing pieces used to analyze an
//! installed npm dependency tree, including:
//! - Reading `package.json` manifests into dependency name lists
//! - Measuring the on-disk footprint of a directory
//! - Resolving the project root and the install location of a module

mod config;
mod constants;
mod manifest;
mod size;
mod types;

// Re-export public API
pub use config::{module_dir, node_modules_dir, project_name, resolve_path, resolve_project_root};
pub use constants::{MANIFEST_FILE, NODE_MODULES_DIR};
pub use manifest::{manifest_path, read_manifest};
pub use size::size_of_dir;
pub use types::{Manifest, ManifestError};
