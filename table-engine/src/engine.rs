//! FILENAME: table-engine/src/engine.rs
//! Table Engine - composes the calculation stages into one derived view.
//!
//! Algorithm:
//! 1. Sort: compute the stable row permutation from the sort spec
//! 2. Group: partition the sorted rows into the group tree
//! 3. Classify: flatten the tree into row descriptors, honoring expansion
//! 4. Describe the visible column headers with their sort indicators
//!
//! `compute_view` is pure in its inputs: calling it twice with the same
//! rows, columns, specs and expansion state yields structurally identical
//! output. The engine performs no I/O, never blocks, and recomputes the
//! whole view per call rather than patching incrementally.

use log::debug;

use table_model::RowValue;

use crate::classify::classify;
use crate::definition::{Column, ColumnSet, GroupSpec, SortSpec, TableState};
use crate::error::ConfigError;
use crate::expansion::ExpansionState;
use crate::group::group_rows;
use crate::sort::sort_order;
use crate::view::{HeaderDescriptor, TableView};

/// Computes the full renderable view for one render pass.
///
/// Zero rows are not an error: the result simply carries zero row
/// descriptors. Unknown or flag-violating column references in either
/// spec fail with `ConfigError`.
pub fn compute_view<R>(
    rows: &[R],
    columns: &ColumnSet<R>,
    sort: &SortSpec,
    group: &GroupSpec,
    expansion: &ExpansionState,
) -> Result<TableView, ConfigError> {
    let order = sort_order(rows, sort, columns)?;
    let tree = group_rows(rows, &order, group, columns)?;
    let descriptors = classify(&tree, rows, columns, group, expansion);
    let headers = header_descriptors(columns, sort, group);
    let column_count = headers.len();

    debug!(
        "computed view: {} records -> {} descriptors ({} groups deep)",
        rows.len(),
        descriptors.len(),
        group.depth()
    );

    Ok(TableView {
        headers,
        rows: descriptors,
        column_count,
        total_leaf_count: rows.len(),
        is_windowed: false,
        total_row_count: None,
        window_start_row: None,
    })
}

/// Headers for the visible (non-grouping) columns, in declaration order.
fn header_descriptors<R>(
    columns: &ColumnSet<R>,
    sort: &SortSpec,
    group: &GroupSpec,
) -> Vec<HeaderDescriptor> {
    columns
        .iter()
        .filter(|c| !group.contains(&c.key))
        .map(|c| HeaderDescriptor {
            column: c.key.clone(),
            label: c.header.clone().unwrap_or_default(),
            sortable: c.sortable,
            groupable: c.groupable,
            sort: sort.direction_of(&c.key),
            sort_index: sort.position_of(&c.key),
        })
        .collect()
}

// ============================================================================
// TABLE CONTROLLER
// ============================================================================

/// The stateful side of one table instance.
///
/// Owns the column set, the live sort/group specs and the expansion
/// state, and translates user gestures (header click, group menu, row
/// toggle) into spec mutations. Specs are validated on the way in, so a
/// controller can always compute.
pub struct TableController<R> {
    columns: ColumnSet<R>,
    sort: SortSpec,
    group: GroupSpec,
    expansion: ExpansionState,
}

impl<R> TableController<R> {
    /// Builds a controller over the given columns. Duplicate column keys
    /// are rejected here, at configuration time.
    pub fn new(columns: Vec<Column<R>>) -> Result<Self, ConfigError> {
        Ok(TableController {
            columns: ColumnSet::new(columns)?,
            sort: SortSpec::new(),
            group: GroupSpec::new(),
            expansion: ExpansionState::new(),
        })
    }

    /// Sets the initial sort spec (builder form).
    pub fn with_sort(mut self, sort: SortSpec) -> Result<Self, ConfigError> {
        self.set_sort(sort)?;
        Ok(self)
    }

    /// Sets the initial group spec (builder form).
    pub fn with_group(mut self, group: GroupSpec) -> Result<Self, ConfigError> {
        self.set_group(group)?;
        Ok(self)
    }

    pub fn columns(&self) -> &ColumnSet<R> {
        &self.columns
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn group(&self) -> &GroupSpec {
        &self.group
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// Replaces the sort spec. Fails without touching state if the spec
    /// references an unknown or unsortable column.
    pub fn set_sort(&mut self, sort: SortSpec) -> Result<(), ConfigError> {
        self.columns.validate_sort(&sort)?;
        self.sort = sort;
        Ok(())
    }

    /// Replaces the group spec. Fails without touching state if the spec
    /// references an unknown or non-groupable column.
    pub fn set_group(&mut self, group: GroupSpec) -> Result<(), ConfigError> {
        self.columns.validate_group(&group)?;
        self.group = group;
        Ok(())
    }

    /// Header click: cycles the column through ascending, descending,
    /// unsorted.
    pub fn toggle_sort(&mut self, column: &str) -> Result<(), ConfigError> {
        let col = self.columns.require(column)?;
        if !col.sortable {
            return Err(ConfigError::NotSortable(column.to_string()));
        }
        self.sort.toggle(column);
        Ok(())
    }

    /// Group menu: adds the column as the innermost grouping level, or
    /// removes it if already grouped.
    pub fn toggle_group(&mut self, column: &str) -> Result<(), ConfigError> {
        let col = self.columns.require(column)?;
        if !col.groupable {
            return Err(ConfigError::NotGroupable(column.to_string()));
        }
        self.group.toggle(column);
        Ok(())
    }

    /// Row-header click: flips one group's expansion and returns the new
    /// state.
    pub fn toggle_expanded(&mut self, path: &[RowValue]) -> bool {
        self.expansion.toggle(path)
    }

    pub fn is_expanded(&self, path: &[RowValue]) -> bool {
        self.expansion.is_expanded(path)
    }

    /// Expands every group the current spec produces over `rows`.
    pub fn expand_all(&mut self, rows: &[R]) -> Result<(), ConfigError> {
        let order = sort_order(rows, &self.sort, &self.columns)?;
        let tree = group_rows(rows, &order, &self.group, &self.columns)?;
        self.expansion.expand_all(&tree);
        Ok(())
    }

    pub fn collapse_all(&mut self) {
        self.expansion.collapse_all();
    }

    /// Computes the view for the current state. Safe to call once per
    /// render pass; each data refresh is a fresh full recomputation.
    pub fn compute(&self, rows: &[R]) -> Result<TableView, ConfigError> {
        compute_view(rows, &self.columns, &self.sort, &self.group, &self.expansion)
    }

    /// Snapshot of the user-intent state, for persistence.
    pub fn state(&self) -> TableState {
        TableState {
            sort: self.sort.clone(),
            group: self.group.clone(),
            expansion: self.expansion.clone(),
        }
    }

    /// Restores a previously saved snapshot, re-validating the specs
    /// against the current columns.
    pub fn restore(&mut self, state: TableState) -> Result<(), ConfigError> {
        self.columns.validate_sort(&state.sort)?;
        self.columns.validate_group(&state.group)?;
        self.sort = state.sort;
        self.group = state.group;
        self.expansion = state.expansion;
        Ok(())
    }
}
