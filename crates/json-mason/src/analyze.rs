//! Scope-local duplicate key detection.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::tree::{NodeId, Tree};

/// Scan every naming scope and collect the nodes whose trimmed keys collide
/// with a sibling's.
///
/// Both the first holder of a key and every later sibling repeating it are
/// flagged. Scopes are independent: the same key in two different scopes is
/// never a collision, and empty (or whitespace-only) keys never collide.
/// The set is rebuilt from scratch on every call, so the result for an
/// unchanged tree is always identical.
pub fn analyze(tree: &Tree) -> HashSet<NodeId> {
    let mut flagged = HashSet::new();
    let mut scopes = vec![tree.root()];
    while let Some(scope) = scopes.pop() {
        let children = match tree.children(scope) {
            Ok(children) => children,
            Err(_) => continue,
        };
        let mut first_holder: HashMap<&str, NodeId> = HashMap::new();
        for &id in children {
            if let Some(node) = tree.node(id) {
                if node.is_container() {
                    scopes.push(id);
                }
                let key = node.trimmed_key();
                if key.is_empty() {
                    continue;
                }
                match first_holder.entry(key) {
                    Entry::Occupied(first) => {
                        flagged.insert(*first.get());
                        flagged.insert(id);
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(id);
                    }
                }
            }
        }
    }
    flagged
}
