use log::{debug, trace};

use crate::{
    dominators::Dominators,
    types::{ModuleId, ModuleMap},
};

/// Credits every module's own size to each of its critical ancestors and
/// records it as one of their dependents.
///
/// Each (module, critical ancestor) pair is applied exactly once, so the
/// resulting `dep_size` values do not depend on iteration order. The root
/// is never credited.
pub fn propagate_weights(modules: &mut ModuleMap, dominators: &Dominators) {
    let mut contributions = 0usize;
    for id in modules.ids() {
        let size = modules.module(id).size;
        for ancestor in dominators.critical(id) {
            if ancestor == ModuleId::ROOT {
                continue;
            }
            trace!("{} carries {} ({} bytes)", modules.name(ancestor), modules.name(id), size);
            let target = modules.module_mut(ancestor);
            target.dependents.push(id);
            target.dep_size += size;
            contributions += 1;
        }
    }
    debug!("Applied {} weight contributions across {} modules", contributions, modules.len());
}
