use anyhow::{Context, Result};
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use std::path::Path;

use pokedeps_core::{Manifest, module_dir, read_manifest, size_of_dir};

use crate::{
    error::WeightError,
    types::{DependencyGraph, ModuleId, ModuleMap},
};

/// Builds the module graph of the project installed at `root`.
///
/// Walks manifests depth-first from the project's `package.json`. Every
/// dependency name becomes one node, looked up in `<root>/node_modules`;
/// names without an install directory land in the missing set, in the order
/// they are first met. Dev dependencies are only followed for the project
/// itself.
///
/// The root manifest is the only one whose failure is fatal.
pub fn build_graph(root: &Path, project_name: &str, include_dev: bool) -> Result<DependencyGraph> {
    info!("Building dependency graph for {} from {}", project_name, root.display());

    let manifest = read_manifest(root).map_err(WeightError::from)?;
    let mut modules = ModuleMap::new(project_name, root, 0);
    let mut missing: Vec<String> = Vec::new();

    // Each frame is a module and the cursor into its declared dependencies.
    // A name is expanded only when it is first created, so every module is
    // pushed at most once and cycles terminate.
    let mut stack: Vec<(ModuleId, Vec<String>, usize)> =
        vec![(ModuleId::ROOT, declared(&manifest, include_dev), 0)];

    while let Some(frame) = stack.last_mut() {
        let current = frame.0;
        let Some(name) = frame.1.get(frame.2).cloned() else {
            trace!("Finished {}", modules.name(current));
            stack.pop();
            continue;
        };
        frame.2 += 1;

        // Known module: only the ancestor set grows, the subtree is not walked again
        if let Some(existing) = modules.id_of(&name) {
            trace!("{} already known, adding ancestor {}", name, modules.name(current));
            modules.add_ancestor(existing, current);
            continue;
        }

        let dir = module_dir(root, &name);
        if !dir.is_dir() {
            warn!("{} is missing {}", modules.name(current), name);
            if !missing.contains(&name) {
                missing.push(name);
            }
            continue;
        }

        let id = modules.insert(name.as_str(), dir.clone(), 0);
        modules.add_ancestor(id, current);
        trace!("Visiting {} at depth {}", name, stack.len());

        match read_manifest(&dir) {
            Ok(child) => stack.push((id, declared(&child, false), 0)),
            Err(e) => warn!("Treating {} as a leaf: {}", name, e),
        }
    }

    debug!("Discovered {} modules, {} missing", modules.len(), missing.len());

    measure(&mut modules)?;

    Ok(DependencyGraph { modules, missing })
}

fn declared(manifest: &Manifest, include_dev: bool) -> Vec<String> {
    manifest.declared(include_dev).map(str::to_string).collect()
}

/// Measures every discovered module directory. The reads are independent,
/// so they fan out over the rayon pool.
fn measure(modules: &mut ModuleMap) -> Result<()> {
    debug!(
        "Measuring {} module directories (using {} threads)",
        modules.len(),
        rayon::current_num_threads()
    );
    let sizes: Vec<u64> = modules
        .as_slice()
        .par_iter()
        .map(|m| {
            size_of_dir(&m.path).with_context(|| format!("Failed to measure module {}", m.name))
        })
        .collect::<Result<_>>()?;

    modules.assign_sizes(&sizes);
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::{collections::BTreeSet, fs, path::PathBuf};
    use tempfile::TempDir;

    pub(crate) fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Writes `<root>/package.json` (or the one of an installed module) with
    /// the given dependency names, plus a payload file of `payload` bytes.
    pub(crate) fn create_package(
        root: &Path,
        module: Option<&str>,
        deps: &[&str],
        dev_deps: &[&str],
        payload: usize,
    ) {
        let dir = match module {
            Some(name) => format!("node_modules/{}/", name),
            None => String::new(),
        };
        let as_object = |names: &[&str]| {
            names.iter().map(|n| format!("\"{}\": \"*\"", n)).collect::<Vec<_>>().join(", ")
        };
        let manifest = format!(
            "{{ \"name\": \"{}\", \"dependencies\": {{ {} }}, \"devDependencies\": {{ {} }} }}",
            module.unwrap_or("app"),
            as_object(deps),
            as_object(dev_deps)
        );
        create_test_file(root, &format!("{}package.json", dir), &manifest);
        if payload > 0 {
            create_test_file(root, &format!("{}index.js", dir), &"x".repeat(payload));
        }
    }

    fn names_of(graph: &DependencyGraph, ids: &BTreeSet<ModuleId>) -> Vec<String> {
        ids.iter().map(|&id| graph.modules.name(id).to_string()).collect()
    }

    #[test]
    fn test_build_graph_shared_dependency() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_package(root, None, &["a", "b"], &[], 0);
        create_package(root, Some("a"), &["c"], &[], 10);
        create_package(root, Some("b"), &["c"], &[], 10);
        create_package(root, Some("c"), &[], &[], 10);

        let graph = build_graph(root, "app", false).unwrap();
        let order: Vec<_> = graph.modules.iter().map(|(_, m)| m.name.as_str()).collect();
        assert_eq!(order, vec!["app", "a", "c", "b"]);

        let c = graph.modules.get("c").unwrap();
        assert_eq!(names_of(&graph, &c.ancestors), vec!["a", "b"]);
        assert!(graph.missing.is_empty());
    }

    #[test]
    fn test_build_graph_records_missing_dependency() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_package(root, None, &["left-pad", "a"], &[], 0);
        create_package(root, Some("a"), &[], &[], 0);

        let graph = build_graph(root, "app", false).unwrap();
        assert_eq!(graph.missing, vec!["left-pad"]);
        assert!(graph.modules.get("left-pad").is_none());
        assert!(graph.modules.get("a").is_some());
    }

    #[test]
    fn test_build_graph_dev_dependencies_only_for_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_package(root, None, &["a"], &["jest"], 0);
        create_package(root, Some("a"), &[], &["mocha"], 0);
        create_package(root, Some("jest"), &[], &[], 0);
        create_package(root, Some("mocha"), &[], &[], 0);

        let without = build_graph(root, "app", false).unwrap();
        assert!(without.modules.get("jest").is_none());
        assert!(without.modules.get("mocha").is_none());

        let with = build_graph(root, "app", true).unwrap();
        assert!(with.modules.get("jest").is_some());
        assert!(with.modules.get("mocha").is_none());
    }

    #[test]
    fn test_build_graph_every_module_has_ancestors() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_package(root, None, &["a", "b"], &[], 0);
        create_package(root, Some("a"), &["b", "c"], &[], 0);
        create_package(root, Some("b"), &["c"], &[], 0);
        create_package(root, Some("c"), &[], &[], 0);

        let graph = build_graph(root, "app", false).unwrap();
        for (id, module) in graph.modules.iter() {
            if id == ModuleId::ROOT {
                assert!(module.ancestors.is_empty());
            } else {
                assert!(!module.ancestors.is_empty(), "{} has no ancestors", module.name);
            }
        }
    }

    #[test]
    fn test_build_graph_terminates_on_cyclic_manifests() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_package(root, None, &["a"], &[], 0);
        create_package(root, Some("a"), &["b"], &[], 0);
        create_package(root, Some("b"), &["a"], &[], 0);

        let graph = build_graph(root, "app", false).unwrap();
        assert_eq!(graph.modules.len(), 3);
        let a = graph.modules.get("a").unwrap();
        assert_eq!(names_of(&graph, &a.ancestors), vec!["app", "b"]);
    }

    #[test]
    fn test_build_graph_keeps_every_module_of_a_deep_chain() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let names: Vec<String> = (0..300).map(|i| format!("m{}", i)).collect();
        create_package(root, None, &[names[0].as_str()], &[], 0);
        for (i, name) in names.iter().enumerate() {
            let next: Vec<&str> = names.get(i + 1).map(|n| vec![n.as_str()]).unwrap_or_default();
            create_package(root, Some(name.as_str()), &next, &[], 0);
        }

        let graph = build_graph(root, "app", false).unwrap();
        assert_eq!(graph.modules.len(), 301);
        assert!(graph.missing.is_empty());
        let last = graph.modules.get("m299").unwrap();
        assert_eq!(names_of(&graph, &last.ancestors), vec!["m298"]);
    }

    #[test]
    fn test_build_graph_missing_in_discovery_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_package(root, None, &["zeta", "a", "alpha"], &[], 0);
        create_package(root, Some("a"), &["mu", "zeta"], &[], 0);

        let graph = build_graph(root, "app", false).unwrap();
        assert_eq!(graph.missing, vec!["zeta", "mu", "alpha"]);
    }

    #[test]
    fn test_build_graph_scoped_module() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_package(root, None, &["@babel/core"], &[], 0);
        create_package(root, Some("@babel/core"), &[], &[], 5);

        let graph = build_graph(root, "app", false).unwrap();
        let core = graph.modules.get("@babel/core").unwrap();
        assert_eq!(core.path, root.join("node_modules/@babel/core"));
        assert!(core.size >= 5);
    }

    #[test]
    fn test_build_graph_unreadable_dependency_manifest_is_a_leaf() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_package(root, None, &["broken"], &[], 0);
        create_test_file(root, "node_modules/broken/package.json", "{ not json");

        let graph = build_graph(root, "app", false).unwrap();
        assert!(graph.modules.get("broken").is_some());
        assert!(graph.missing.is_empty());
    }

    #[test]
    fn test_build_graph_sizes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_package(root, None, &["a"], &[], 0);
        create_package(root, Some("a"), &[], &[], 2000);

        let graph = build_graph(root, "app", false).unwrap();
        let a = graph.modules.get("a").unwrap();
        assert_eq!(a.size, size_of_dir(&root.join("node_modules/a")).unwrap());
        assert_eq!(a.dep_size, a.size);
        // The project directory contains node_modules, so it is always larger
        assert!(graph.modules.root().size > a.size);
    }

    #[test]
    fn test_build_graph_root_manifest_missing() {
        let temp_dir = TempDir::new().unwrap();

        let err = build_graph(temp_dir.path(), "app", false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WeightError>(),
            Some(WeightError::ManifestUnreadable { .. })
        ));
    }

    #[test]
    fn test_build_graph_root_manifest_unparsable() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "package.json", "[1, 2");

        let err = build_graph(temp_dir.path(), "app", false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WeightError>(),
            Some(WeightError::ManifestUnparsable { .. })
        ));
    }
}
