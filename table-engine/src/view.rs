//! FILENAME: table-engine/src/view.rs
//! Table View - renderable output for the presentation layer.
//!
//! The classifier tags every emitted row and cell once, so the
//! presentation layer switches on `kind` fields instead of re-deriving
//! "is this a header / aggregate / placeholder" per render pass.

use serde::{Deserialize, Serialize};
use table_model::RowValue;

use crate::definition::{ColumnKey, SortDirection};
use crate::expansion::NodePath;

// ============================================================================
// CELL AND ROW KINDS
// ============================================================================

/// The type of an emitted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    /// One source record.
    Leaf,
    /// One group node, carrying the toggle affordance.
    GroupHeader,
}

/// The type of a cell within an emitted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    /// Regular data cell on a leaf row.
    Data,
    /// Group value plus expand/collapse affordance on a header row.
    GroupToggle,
    /// Computed aggregate on a header row.
    Aggregate,
    /// Empty alignment cell on a header row; renders as nothing.
    /// Placeholders never appear on leaf rows.
    Placeholder,
}

// ============================================================================
// CELL DESCRIPTOR
// ============================================================================

/// A single renderable cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellDescriptor {
    /// The column this cell belongs to.
    pub column: ColumnKey,

    pub kind: CellKind,

    /// The underlying value.
    pub value: RowValue,

    /// Pre-formatted display string.
    pub rendered: String,

    /// Number of grid columns this cell covers.
    pub col_span: u16,
}

impl CellDescriptor {
    /// Creates a leaf data cell.
    pub fn data(column: ColumnKey, value: RowValue, rendered: String) -> Self {
        CellDescriptor {
            column,
            kind: CellKind::Data,
            value,
            rendered,
            col_span: 1,
        }
    }

    /// Creates the group value / toggle cell of a header row.
    pub fn group_toggle(column: ColumnKey, value: RowValue, col_span: u16) -> Self {
        let rendered = value.label();
        CellDescriptor {
            column,
            kind: CellKind::GroupToggle,
            value,
            rendered,
            col_span,
        }
    }

    /// Creates an aggregate cell of a header row.
    pub fn aggregate(column: ColumnKey, value: RowValue) -> Self {
        let rendered = value.display();
        CellDescriptor {
            column,
            kind: CellKind::Aggregate,
            value,
            rendered,
            col_span: 1,
        }
    }

    /// Creates an empty alignment cell of a header row.
    pub fn placeholder(column: ColumnKey) -> Self {
        CellDescriptor {
            column,
            kind: CellKind::Placeholder,
            value: RowValue::Empty,
            rendered: String::new(),
            col_span: 1,
        }
    }
}

// ============================================================================
// ROW DESCRIPTOR
// ============================================================================

/// One renderable row of the computed view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDescriptor {
    pub kind: RowKind,

    /// Nesting depth: a header's position in the group spec; a leaf sits
    /// one past its innermost ancestor (0 in a flat table).
    pub depth: usize,

    pub cells: Vec<CellDescriptor>,

    /// Index into the caller's row slice; `None` on group headers.
    pub source_row: Option<usize>,

    /// Group-key path: identifies the node on headers, the ancestor
    /// chain on leaves. Pass it to the expansion toggle.
    pub path: NodePath,

    /// Whether the subtree is currently expanded. Always `false` on
    /// leaves.
    pub expanded: bool,

    /// Leaf rows beneath a header; `1` on a leaf.
    pub leaf_count: usize,
}

impl RowDescriptor {
    pub fn leaf(depth: usize, cells: Vec<CellDescriptor>, source_row: usize, path: NodePath) -> Self {
        RowDescriptor {
            kind: RowKind::Leaf,
            depth,
            cells,
            source_row: Some(source_row),
            path,
            expanded: false,
            leaf_count: 1,
        }
    }

    pub fn group_header(
        depth: usize,
        cells: Vec<CellDescriptor>,
        path: NodePath,
        expanded: bool,
        leaf_count: usize,
    ) -> Self {
        RowDescriptor {
            kind: RowKind::GroupHeader,
            depth,
            cells,
            source_row: None,
            path,
            expanded,
            leaf_count,
        }
    }
}

// ============================================================================
// HEADER DESCRIPTOR
// ============================================================================

/// Describes one visible column header, with the affordance flags and
/// sort indicator state the presentation layer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderDescriptor {
    pub column: ColumnKey,

    /// Display label; empty when the column declares no header.
    pub label: String,

    pub sortable: bool,
    pub groupable: bool,

    /// Current sort direction, when this column participates in the sort.
    pub sort: Option<SortDirection>,

    /// Position within a multi-key sort (0 = primary).
    pub sort_index: Option<usize>,
}

// ============================================================================
// TABLE VIEW
// ============================================================================

/// The complete computed view for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    /// Visible column headers (grouping columns are excluded).
    pub headers: Vec<HeaderDescriptor>,

    /// Ordered renderable rows.
    pub rows: Vec<RowDescriptor>,

    /// Number of visible columns.
    pub column_count: usize,

    /// Total leaf rows in the source data, visible or collapsed away.
    pub total_leaf_count: usize,

    /// Indicates a partial view produced by `window`.
    pub is_windowed: bool,

    /// For windowed views: the full row descriptor count.
    pub total_row_count: Option<usize>,

    /// For windowed views: the starting row index.
    pub window_start_row: Option<usize>,
}

impl TableView {
    /// Creates a windowed subset of the view for paged rendering.
    pub fn window(&self, start_row: usize, row_count: usize) -> TableView {
        let end_row = (start_row + row_count).min(self.rows.len());
        let start_row = start_row.min(end_row);

        TableView {
            headers: self.headers.clone(),
            rows: self.rows[start_row..end_row].to_vec(),
            column_count: self.column_count,
            total_leaf_count: self.total_leaf_count,
            is_windowed: true,
            total_row_count: Some(self.rows.len()),
            window_start_row: Some(start_row),
        }
    }

    /// Emitted leaf descriptors only.
    pub fn leaf_rows(&self) -> impl Iterator<Item = &RowDescriptor> {
        self.rows.iter().filter(|r| r.kind == RowKind::Leaf)
    }

    /// Emitted group header descriptors only.
    pub fn group_headers(&self) -> impl Iterator<Item = &RowDescriptor> {
        self.rows.iter().filter(|r| r.kind == RowKind::GroupHeader)
    }
}
