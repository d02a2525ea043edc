//! FILENAME: table-engine/src/expansion.rs
//! Expansion State - per-group expand/collapse, keyed by group-key path.
//!
//! Identity is the ordered sequence of group-key values from the
//! outermost group down to the node, NOT a position in the flattened
//! view. That way expansion survives re-sorting and data refresh as long
//! as the same group keys reappear, and toggling "en" under one series
//! never affects "en" under another.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use table_model::RowValue;

use crate::group::{GroupNode, NodeChildren};

/// Ordered group-key values identifying one node in the tree.
pub type NodePath = SmallVec<[RowValue; 4]>;

/// Tracks which group nodes are expanded.
///
/// Every node starts collapsed; `toggle` flips exactly one node and no
/// other transition exists. Collapsing an ancestor hides its descendants
/// but does not reset their own state: re-expanding the ancestor shows
/// them exactly as they were left.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionState {
    expanded: FxHashSet<NodePath>,
}

impl ExpansionState {
    pub fn new() -> Self {
        ExpansionState::default()
    }

    pub fn is_expanded(&self, path: &[RowValue]) -> bool {
        self.expanded.contains(path)
    }

    /// Flips the node's state and returns the new value.
    pub fn toggle(&mut self, path: &[RowValue]) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(NodePath::from(path));
            true
        }
    }

    pub fn expand(&mut self, path: &[RowValue]) {
        self.expanded.insert(NodePath::from(path));
    }

    pub fn collapse(&mut self, path: &[RowValue]) {
        self.expanded.remove(path);
    }

    /// Expands every group node in the given tree.
    pub fn expand_all(&mut self, root: &GroupNode) {
        let mut path = NodePath::new();
        self.expand_subtree(root, &mut path);
    }

    fn expand_subtree(&mut self, node: &GroupNode, path: &mut NodePath) {
        if let NodeChildren::Groups(children) = &node.children {
            for child in children {
                path.push(child.key.clone());
                self.expanded.insert(path.clone());
                self.expand_subtree(child, path);
                path.pop();
            }
        }
    }

    /// Collapses everything back to the initial state.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Number of paths currently expanded.
    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }
}
