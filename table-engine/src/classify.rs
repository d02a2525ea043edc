//! FILENAME: table-engine/src/classify.rs
//! Row Classifier - flattens the group tree into renderable descriptors.
//!
//! Depth-first preorder walk. A collapsed node contributes its header and
//! nothing else; its subtree is skipped outright rather than emitted as
//! hidden rows. Grouping columns are omitted from leaf cells - their
//! value is already on the ancestor header.

use log::trace;

use crate::definition::{Column, ColumnSet, GroupSpec};
use crate::expansion::{ExpansionState, NodePath};
use crate::group::{GroupNode, NodeChildren};
use crate::view::{CellDescriptor, RowDescriptor};

/// Flattens `tree` into the ordered descriptor sequence, honoring the
/// current expansion state.
pub fn classify<R>(
    tree: &GroupNode,
    rows: &[R],
    columns: &ColumnSet<R>,
    spec: &GroupSpec,
    expansion: &ExpansionState,
) -> Vec<RowDescriptor> {
    let visible: Vec<&Column<R>> = columns
        .iter()
        .filter(|c| !spec.contains(&c.key))
        .collect();

    let mut out = Vec::new();
    let mut path = NodePath::new();
    emit_children(&tree.children, rows, &visible, expansion, &mut path, &mut out);

    trace!(
        "classified {} leaves into {} descriptors",
        tree.leaf_count,
        out.len()
    );
    out
}

fn emit_children<R>(
    children: &NodeChildren,
    rows: &[R],
    visible: &[&Column<R>],
    expansion: &ExpansionState,
    path: &mut NodePath,
    out: &mut Vec<RowDescriptor>,
) {
    match children {
        NodeChildren::Groups(nodes) => {
            for node in nodes {
                path.push(node.key.clone());
                let expanded = expansion.is_expanded(path);
                out.push(header_descriptor(node, visible, path, expanded));
                if expanded {
                    emit_children(&node.children, rows, visible, expansion, path, out);
                }
                path.pop();
            }
        }
        NodeChildren::Rows(indices) => {
            for &idx in indices {
                out.push(leaf_descriptor(idx, &rows[idx], visible, path));
            }
        }
    }
}

/// Builds a group header row.
///
/// When no visible column carries a computed aggregate, the toggle cell
/// spans the full visible width and the header renders as a single band.
/// Otherwise the toggle takes the first column slot and every remaining
/// visible column gets an aggregate cell or an empty placeholder, index-
/// aligned with leaf cells.
fn header_descriptor<R>(
    node: &GroupNode,
    visible: &[&Column<R>],
    path: &NodePath,
    expanded: bool,
) -> RowDescriptor {
    let width = visible.len().max(1) as u16;
    let column = node.column.clone().unwrap_or_default();

    let has_aggregates = visible
        .iter()
        .skip(1)
        .any(|c| node.aggregates.contains_key(&c.key));

    let cells = if has_aggregates {
        let mut cells = Vec::with_capacity(visible.len());
        cells.push(CellDescriptor::group_toggle(column, node.key.clone(), 1));
        for col in visible.iter().skip(1) {
            match node.aggregates.get(&col.key) {
                Some(value) => cells.push(CellDescriptor::aggregate(col.key.clone(), value.clone())),
                None => cells.push(CellDescriptor::placeholder(col.key.clone())),
            }
        }
        cells
    } else {
        vec![CellDescriptor::group_toggle(column, node.key.clone(), width)]
    };

    RowDescriptor::group_header(node.depth, cells, path.clone(), expanded, node.leaf_count)
}

fn leaf_descriptor<R>(
    idx: usize,
    record: &R,
    visible: &[&Column<R>],
    path: &NodePath,
) -> RowDescriptor {
    let cells = visible
        .iter()
        .map(|col| {
            let value = col.value_of(record);
            let rendered = col.render(&value, record);
            CellDescriptor::data(col.key.clone(), value, rendered)
        })
        .collect();

    RowDescriptor::leaf(path.len(), cells, idx, path.clone())
}
