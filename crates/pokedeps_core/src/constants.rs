//! Names of the files and directories that make up an installed npm tree.

/// Manifest file read for the project and for every installed module
pub const MANIFEST_FILE: &str = "package.json";

/// Directory holding installed modules, directly under the project root
pub const NODE_MODULES_DIR: &str = "node_modules";
