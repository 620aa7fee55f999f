use std::{
    collections::{BTreeSet, HashMap},
    path::PathBuf,
};

use crate::dominators::Dominators;

/// Index of a module inside a [`ModuleMap`]. The project itself is always
/// [`ModuleId::ROOT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(usize);

impl ModuleId {
    pub const ROOT: ModuleId = ModuleId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub path: PathBuf,
    /// Modules that directly declare this one as a dependency
    pub ancestors: BTreeSet<ModuleId>,
    /// Footprint of the module's own install directory
    pub size: u64,
    /// `size` plus the size of every module this one critically dominates
    pub dep_size: u64,
    /// Modules for which this one is a critical ancestor, in propagation order
    pub dependents: Vec<ModuleId>,
}

impl Module {
    fn new(name: String, path: PathBuf, size: u64) -> Self {
        Self { name, path, ancestors: BTreeSet::new(), size, dep_size: size, dependents: Vec::new() }
    }
}

/// Arena of modules keyed by name, iterated in creation order.
#[derive(Debug, Clone)]
pub struct ModuleMap {
    modules: Vec<Module>,
    index: HashMap<String, ModuleId>,
}

impl ModuleMap {
    pub fn new(root_name: impl Into<String>, root_path: impl Into<PathBuf>, size: u64) -> Self {
        let root = Module::new(root_name.into(), root_path.into(), size);
        let index = HashMap::from([(root.name.clone(), ModuleId::ROOT)]);
        Self { modules: vec![root], index }
    }

    /// Creates a module, or returns the existing one untouched when the name
    /// is already known.
    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<PathBuf>, size: u64) -> ModuleId {
        let name = name.into();
        if let Some(&id) = self.index.get(&name) {
            return id;
        }
        let id = ModuleId(self.modules.len());
        self.index.insert(name.clone(), id);
        self.modules.push(Module::new(name, path.into(), size));
        id
    }

    /// Records `parent` as a direct ancestor of `child`. Returns false if the
    /// edge was already known.
    pub fn add_ancestor(&mut self, child: ModuleId, parent: ModuleId) -> bool {
        self.modules[child.0].ancestors.insert(parent)
    }

    pub fn root(&self) -> &Module {
        &self.modules[ModuleId::ROOT.0]
    }

    pub fn id_of(&self, name: &str) -> Option<ModuleId> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Module> {
        self.id_of(name).map(|id| self.module(id))
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.0]
    }

    pub(crate) fn module_mut(&mut self, id: ModuleId) -> &mut Module {
        &mut self.modules[id.0]
    }

    pub fn name(&self, id: ModuleId) -> &str {
        &self.modules[id.0].name
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ModuleId> + use<> {
        (0..self.modules.len()).map(ModuleId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
        self.modules.iter().enumerate().map(|(i, m)| (ModuleId(i), m))
    }

    pub(crate) fn as_slice(&self) -> &[Module] {
        &self.modules
    }

    /// Sets every module's size (and resets its `dep_size`), in creation order.
    pub(crate) fn assign_sizes(&mut self, sizes: &[u64]) {
        for (module, &size) in self.modules.iter_mut().zip(sizes) {
            module.size = size;
            module.dep_size = size;
        }
    }

    /// Parent to child adjacency, children in creation order.
    pub fn children(&self) -> Vec<Vec<ModuleId>> {
        let mut children = vec![Vec::new(); self.modules.len()];
        for (id, module) in self.iter() {
            for parent in &module.ancestors {
                children[parent.0].push(id);
            }
        }
        children
    }

    /// Every recorded (parent, child) pair.
    pub fn edges(&self) -> impl Iterator<Item = (ModuleId, ModuleId)> + '_ {
        self.iter().flat_map(|(id, module)| module.ancestors.iter().map(move |&p| (p, id)))
    }
}

/// Output of the graph builder: the module map plus the names that were
/// declared but are not installed, in discovery order.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    pub modules: ModuleMap,
    pub missing: Vec<String>,
}

/// A fully analyzed project.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub graph: DependencyGraph,
    pub dominators: Dominators,
    /// Where the SVG graph was written, when one was requested
    pub graph_file: Option<PathBuf>,
}

impl Analysis {
    pub fn modules(&self) -> &ModuleMap {
        &self.graph.modules
    }

    /// Reference total used for percentages: the project's own `dep_size`.
    pub fn total_size(&self) -> u64 {
        self.graph.modules.root().dep_size
    }
}
