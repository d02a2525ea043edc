//! FILENAME: table-engine/src/group.rs
//! Group Engine - partitions rows into a tree of group nodes.
//!
//! The partition is recursive: each grouping level buckets the rows it
//! receives by that level's accessor value, then recurses into each
//! bucket with the remaining levels. Rows exhausting the spec become the
//! leaf index list of the innermost node.
//!
//! Bucket order is first occurrence within the order the rows arrive in.
//! Because the engine groups AFTER sorting, this is sorted group order
//! whenever the sort spec covers the grouping column, and input order
//! otherwise.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use table_model::RowValue;

use crate::definition::{Column, ColumnKey, ColumnSet, GroupSpec};
use crate::error::ConfigError;

/// Children of a group node: nested groups or leaf row indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeChildren {
    Groups(Vec<GroupNode>),
    Rows(Vec<usize>),
}

/// A node in the group tree.
///
/// Expansion is NOT stored here; it lives in `ExpansionState`, keyed by
/// the group-key path, so the tree can be rebuilt from scratch on every
/// refresh without losing collapse state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    /// The grouping value shared by every row beneath this node.
    /// `Empty` on the virtual root.
    pub key: RowValue,

    /// The column this node groups by; `None` on the virtual root.
    pub column: Option<ColumnKey>,

    /// Position of the grouping column in the `GroupSpec` (0 = outermost).
    pub depth: usize,

    /// Aggregated values, one entry per column with a configured
    /// aggregate function. Columns without one get no entry at all.
    pub aggregates: FxHashMap<ColumnKey, RowValue>,

    /// Number of leaf rows in this node's subtree.
    pub leaf_count: usize,

    pub children: NodeChildren,
}

impl GroupNode {
    /// Nested group children, or an empty slice at the leaf level.
    pub fn group_children(&self) -> &[GroupNode] {
        match &self.children {
            NodeChildren::Groups(nodes) => nodes,
            NodeChildren::Rows(_) => &[],
        }
    }

    /// Leaf row indices directly under this node (innermost level only).
    pub fn leaf_rows(&self) -> &[usize] {
        match &self.children {
            NodeChildren::Groups(_) => &[],
            NodeChildren::Rows(rows) => rows,
        }
    }
}

/// Builds the group tree for `rows`, visited in `order` (the sorted
/// permutation). Returns a virtual root; with an empty spec the root's
/// children are the rows themselves and the table degenerates to flat.
///
/// Invariant: the leaf index lists across the tree partition `order`
/// exactly - no row is duplicated or dropped.
pub fn group_rows<R>(
    rows: &[R],
    order: &[usize],
    spec: &GroupSpec,
    columns: &ColumnSet<R>,
) -> Result<GroupNode, ConfigError> {
    let mut group_columns = Vec::with_capacity(spec.columns.len());
    for key in &spec.columns {
        let column = columns.require(key)?;
        if !column.groupable {
            return Err(ConfigError::NotGroupable(key.clone()));
        }
        group_columns.push(column);
    }

    let children = partition(rows, order.to_vec(), 0, &group_columns, spec, columns);
    Ok(GroupNode {
        key: RowValue::Empty,
        column: None,
        depth: 0,
        aggregates: FxHashMap::default(),
        leaf_count: order.len(),
        children,
    })
}

fn partition<R>(
    rows: &[R],
    indices: Vec<usize>,
    level: usize,
    group_columns: &[&Column<R>],
    spec: &GroupSpec,
    columns: &ColumnSet<R>,
) -> NodeChildren {
    if level >= group_columns.len() {
        return NodeChildren::Rows(indices);
    }
    let group_column = group_columns[level];

    // Ordered buckets, first-occurrence order of each distinct key.
    let mut bucket_of: FxHashMap<RowValue, usize> = FxHashMap::default();
    let mut buckets: Vec<(RowValue, Vec<usize>)> = Vec::new();
    for idx in indices {
        let value = group_column.value_of(&rows[idx]);
        match bucket_of.get(&value) {
            Some(&slot) => buckets[slot].1.push(idx),
            None => {
                bucket_of.insert(value.clone(), buckets.len());
                buckets.push((value, vec![idx]));
            }
        }
    }

    let mut nodes = Vec::with_capacity(buckets.len());
    for (key, bucket) in buckets {
        let aggregates = compute_aggregates(rows, &bucket, spec, columns);
        let leaf_count = bucket.len();
        let children = partition(rows, bucket, level + 1, group_columns, spec, columns);
        nodes.push(GroupNode {
            key,
            column: Some(group_column.key.clone()),
            depth: level,
            aggregates,
            leaf_count,
            children,
        });
    }
    NodeChildren::Groups(nodes)
}

/// Aggregates over all leaf rows of one bucket, for every non-grouping
/// column that opted in. No aggregate function, no entry - aggregation
/// is never applied automatically.
fn compute_aggregates<R>(
    rows: &[R],
    bucket: &[usize],
    spec: &GroupSpec,
    columns: &ColumnSet<R>,
) -> FxHashMap<ColumnKey, RowValue> {
    let mut aggregates = FxHashMap::default();
    for column in columns.iter() {
        if spec.contains(&column.key) || !column.has_aggregate() {
            continue;
        }
        let values: Vec<RowValue> = bucket.iter().map(|&i| column.value_of(&rows[i])).collect();
        if let Some(value) = column.aggregate_of(&values) {
            aggregates.insert(column.key.clone(), value);
        }
    }
    aggregates
}
