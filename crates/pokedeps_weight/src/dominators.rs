//! Critical ancestor computation.
//!
//! A module `C` is a critical ancestor of `M` when every path from the
//! project root down to `M` goes through `C`, i.e. `C` dominates `M` in the
//! parent to child graph rooted at the project. Immediate dominators are
//! computed with the iterative Cooper, Harvey and Kennedy scheme over a
//! reverse postorder, which handles shared subtrees and cycles without
//! enumerating paths.

use log::{debug, trace};

use crate::types::{ModuleId, ModuleMap};

#[derive(Debug, Clone)]
pub struct Dominators {
    /// Immediate dominator per module; `None` for the root and for modules
    /// the root cannot reach
    idom: Vec<Option<ModuleId>>,
}

impl Dominators {
    pub fn immediate(&self, id: ModuleId) -> Option<ModuleId> {
        self.idom.get(id.index()).copied().flatten()
    }

    #[cfg(test)]
    fn is_reachable(&self, id: ModuleId) -> bool {
        id == ModuleId::ROOT || self.immediate(id).is_some()
    }

    /// Critical ancestors of `id`, nearest first. Never contains `id` itself
    /// or the root.
    pub fn critical(&self, id: ModuleId) -> Vec<ModuleId> {
        let mut chain = Vec::new();
        let mut current = self.immediate(id);
        while let Some(dom) = current {
            if dom == ModuleId::ROOT {
                break;
            }
            chain.push(dom);
            current = self.immediate(dom);
        }
        chain
    }

    /// True when `a` is a critical ancestor of `b`.
    #[cfg(test)]
    fn dominates(&self, a: ModuleId, b: ModuleId) -> bool {
        a != b && a != ModuleId::ROOT && self.critical(b).contains(&a)
    }
}

pub fn compute_dominators(modules: &ModuleMap) -> Dominators {
    let n = modules.len();
    let children = modules.children();
    let order = postorder(&children, ModuleId::ROOT);
    debug!("Computing dominators for {} of {} modules", order.len(), n);

    // Postorder rank; the root finishes last and therefore ranks highest
    let mut rank = vec![usize::MAX; n];
    for (i, id) in order.iter().enumerate() {
        rank[id.index()] = i;
    }

    let mut idom: Vec<Option<ModuleId>> = vec![None; n];
    idom[ModuleId::ROOT.index()] = Some(ModuleId::ROOT);

    let mut changed = true;
    let mut rounds = 0;
    while changed {
        changed = false;
        rounds += 1;
        for &node in order.iter().rev() {
            if node == ModuleId::ROOT {
                continue;
            }

            let mut new_idom: Option<ModuleId> = None;
            for &parent in &modules.module(node).ancestors {
                // Unprocessed or unreachable ancestors do not constrain yet
                if idom[parent.index()].is_none() {
                    continue;
                }
                new_idom = Some(match new_idom {
                    None => parent,
                    Some(current) => intersect(&idom, &rank, parent, current),
                });
            }

            if new_idom.is_some() && idom[node.index()] != new_idom {
                idom[node.index()] = new_idom;
                changed = true;
            }
        }
    }
    trace!("Dominators converged after {} rounds", rounds);

    idom[ModuleId::ROOT.index()] = None;
    Dominators { idom }
}

/// Closest common dominator of `a` and `b`.
fn intersect(idom: &[Option<ModuleId>], rank: &[usize], mut a: ModuleId, mut b: ModuleId) -> ModuleId {
    while a != b {
        while rank[a.index()] < rank[b.index()] {
            a = idom[a.index()].unwrap_or(ModuleId::ROOT);
        }
        while rank[b.index()] < rank[a.index()] {
            b = idom[b.index()].unwrap_or(ModuleId::ROOT);
        }
    }
    a
}

/// Depth-first postorder of everything reachable from `start`. Each module
/// is visited once, so cycles terminate.
fn postorder(children: &[Vec<ModuleId>], start: ModuleId) -> Vec<ModuleId> {
    let mut visited = vec![false; children.len()];
    let mut order = Vec::with_capacity(children.len());
    let mut stack: Vec<(ModuleId, usize)> = vec![(start, 0)];
    visited[start.index()] = true;

    while let Some(top) = stack.last_mut() {
        let (node, next) = *top;
        match children[node.index()].get(next) {
            Some(&child) => {
                top.1 += 1;
                if !visited[child.index()] {
                    visited[child.index()] = true;
                    stack.push((child, 0));
                }
            }
            None => {
                order.push(node);
                stack.pop();
            }
        }
    }
    order
}
