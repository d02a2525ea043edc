//! FILENAME: table-engine/src/definition.rs
//! Table Definition - columns and the declarative sort/group state.
//!
//! This module contains the types that DESCRIBE a table. The specs and
//! `TableState` are designed to be:
//! - Serializable (for persisting user intent across sessions)
//! - Immutable snapshots consumed by the calculation pipeline
//!
//! `Column` itself carries caller closures (accessor, aggregate, cell
//! renderer) and is therefore the one configuration type that cannot be
//! serialized.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use table_model::RowValue;

use crate::error::ConfigError;
use crate::expansion::ExpansionState;

/// Key identifying a column, unique within one `ColumnSet`.
pub type ColumnKey = String;

/// Extracts one cell value from a record. Must be pure and deterministic.
pub type Accessor<R> = Arc<dyn Fn(&R) -> RowValue + Send + Sync>;

/// Folds one column's values across a group into a single value.
pub type AggregateFn = Arc<dyn Fn(&[RowValue]) -> RowValue + Send + Sync>;

/// Formats a cell for display, with access to the source record.
pub type CellRenderer<R> = Arc<dyn Fn(&RowValue, &R) -> String + Send + Sync>;

// ============================================================================
// COLUMN
// ============================================================================

/// Declarative description of one table column.
///
/// Columns default to sortable and groupable; callers opt out per column.
/// Aggregation is strictly opt-in: a column with no aggregate function
/// contributes empty placeholder cells to group headers, never an
/// automatic summary.
pub struct Column<R> {
    /// Unique identity key, referenced by sort and group specs.
    pub key: ColumnKey,

    /// Header label. Columns without one render an empty header cell.
    pub header: Option<String>,

    /// Whether this column may appear in a `GroupSpec`.
    pub groupable: bool,

    /// Whether this column may appear in a `SortSpec`.
    pub sortable: bool,

    accessor: Accessor<R>,
    aggregate: Option<AggregateFn>,
    renderer: Option<CellRenderer<R>>,
}

impl<R> Column<R> {
    pub fn new(
        key: impl Into<String>,
        accessor: impl Fn(&R) -> RowValue + Send + Sync + 'static,
    ) -> Self {
        Column {
            key: key.into(),
            header: None,
            groupable: true,
            sortable: true,
            accessor: Arc::new(accessor),
            aggregate: None,
            renderer: None,
        }
    }

    /// Sets the header label.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Opts this column into group aggregation.
    pub fn with_aggregate(
        mut self,
        aggregate: impl Fn(&[RowValue]) -> RowValue + Send + Sync + 'static,
    ) -> Self {
        self.aggregate = Some(Arc::new(aggregate));
        self
    }

    /// Installs a custom cell renderer for leaf rows.
    pub fn with_renderer(
        mut self,
        renderer: impl Fn(&RowValue, &R) -> String + Send + Sync + 'static,
    ) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn with_groupable(mut self, groupable: bool) -> Self {
        self.groupable = groupable;
        self
    }

    /// Reads this column's value from a record.
    pub fn value_of(&self, record: &R) -> RowValue {
        (self.accessor)(record)
    }

    pub fn has_aggregate(&self) -> bool {
        self.aggregate.is_some()
    }

    /// Applies the configured aggregate function, if any.
    pub fn aggregate_of(&self, values: &[RowValue]) -> Option<RowValue> {
        self.aggregate.as_ref().map(|f| f(values))
    }

    /// Renders a leaf cell: custom renderer when configured, default
    /// display formatting otherwise.
    pub fn render(&self, value: &RowValue, record: &R) -> String {
        match &self.renderer {
            Some(f) => f(value, record),
            None => value.display(),
        }
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Column {
            key: self.key.clone(),
            header: self.header.clone(),
            groupable: self.groupable,
            sortable: self.sortable,
            accessor: Arc::clone(&self.accessor),
            aggregate: self.aggregate.clone(),
            renderer: self.renderer.clone(),
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("groupable", &self.groupable)
            .field("sortable", &self.sortable)
            .field("has_aggregate", &self.aggregate.is_some())
            .field("has_renderer", &self.renderer.is_some())
            .finish()
    }
}

// ============================================================================
// COLUMN SET
// ============================================================================

/// A validated, ordered collection of columns.
///
/// Key uniqueness is enforced here, at configuration time, so the
/// calculation pipeline never has to re-check it.
pub struct ColumnSet<R> {
    columns: Vec<Column<R>>,
    index: FxHashMap<ColumnKey, usize>,
}

impl<R> ColumnSet<R> {
    pub fn new(columns: Vec<Column<R>>) -> Result<Self, ConfigError> {
        let mut index = FxHashMap::default();
        for (i, column) in columns.iter().enumerate() {
            if index.insert(column.key.clone(), i).is_some() {
                return Err(ConfigError::DuplicateColumn(column.key.clone()));
            }
        }
        Ok(ColumnSet { columns, index })
    }

    pub fn get(&self, key: &str) -> Option<&Column<R>> {
        self.index.get(key).map(|&i| &self.columns[i])
    }

    /// Like `get`, but an unknown key is a configuration error.
    pub fn require(&self, key: &str) -> Result<&Column<R>, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::UnknownColumn(key.to_string()))
    }

    /// Columns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Column<R>> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Checks that every sort key names an existing, sortable column.
    pub fn validate_sort(&self, spec: &SortSpec) -> Result<(), ConfigError> {
        for key in &spec.keys {
            let column = self.require(&key.column)?;
            if !column.sortable {
                return Err(ConfigError::NotSortable(key.column.clone()));
            }
        }
        Ok(())
    }

    /// Checks that every group key names an existing, groupable column.
    pub fn validate_group(&self, spec: &GroupSpec) -> Result<(), ConfigError> {
        for key in &spec.columns {
            let column = self.require(key)?;
            if !column.groupable {
                return Err(ConfigError::NotGroupable(key.clone()));
            }
        }
        Ok(())
    }
}

impl<R> Clone for ColumnSet<R> {
    fn clone(&self) -> Self {
        ColumnSet {
            columns: self.columns.clone(),
            index: self.index.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.columns.iter().map(|c| &c.key))
            .finish()
    }
}

// ============================================================================
// SORT SPEC
// ============================================================================

/// Sort direction for one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Ascending
    }
}

impl SortDirection {
    /// Applies this direction to a raw comparison result. Descending
    /// reverses the comparison only; tie-breaking is untouched.
    pub fn apply(self, ord: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// One (column, direction) sort entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: ColumnKey,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        SortKey {
            column: column.into(),
            direction,
        }
    }

    pub fn ascending(column: impl Into<String>) -> Self {
        SortKey::new(column, SortDirection::Ascending)
    }

    pub fn descending(column: impl Into<String>) -> Self {
        SortKey::new(column, SortDirection::Descending)
    }
}

/// Ordered multi-key sort specification. Later entries break ties of
/// earlier ones; the final tie-break is always original input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub keys: Vec<SortKey>,
}

impl SortSpec {
    /// The empty spec: rows keep their input order.
    pub fn new() -> Self {
        SortSpec::default()
    }

    pub fn by(column: impl Into<String>, direction: SortDirection) -> Self {
        SortSpec {
            keys: vec![SortKey::new(column, direction)],
        }
    }

    /// Appends a tie-breaking sort key.
    pub fn then(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.keys.push(SortKey::new(column, direction));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|k| k.column == column)
            .map(|k| k.direction)
    }

    /// Position of a column within the multi-key sort (0 = primary).
    pub fn position_of(&self, column: &str) -> Option<usize> {
        self.keys.iter().position(|k| k.column == column)
    }

    /// Header-click cycle: unsorted -> ascending -> descending -> unsorted.
    /// Replaces the whole spec, matching a plain (non-additive) click.
    pub fn toggle(&mut self, column: &str) {
        match self.direction_of(column) {
            None => self.keys = vec![SortKey::ascending(column)],
            Some(SortDirection::Ascending) => self.keys = vec![SortKey::descending(column)],
            Some(SortDirection::Descending) => self.keys.clear(),
        }
    }
}

// ============================================================================
// GROUP SPEC
// ============================================================================

/// Ordered grouping specification; the first key is the outermost group
/// level. Empty means no grouping (a flat table).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub columns: Vec<ColumnKey>,
}

impl GroupSpec {
    /// The empty spec: no grouping.
    pub fn new() -> Self {
        GroupSpec::default()
    }

    pub fn by<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GroupSpec {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Nesting depth = number of grouping levels.
    pub fn depth(&self) -> usize {
        self.columns.len()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Adds the column as the innermost level, or removes it if present.
    pub fn toggle(&mut self, column: &str) {
        match self.columns.iter().position(|c| c == column) {
            Some(i) => {
                self.columns.remove(i);
            }
            None => self.columns.push(column.to_string()),
        }
    }
}

// ============================================================================
// TABLE STATE
// ============================================================================

/// Serializable snapshot of one table's user intent: sort, grouping and
/// expansion. Save it when a screen unmounts, restore it when the same
/// screen comes back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableState {
    pub sort: SortSpec,
    pub group: GroupSpec,
    pub expansion: ExpansionState,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sub {
        name: &'static str,
        score: f64,
    }

    fn test_columns() -> Vec<Column<Sub>> {
        vec![
            Column::new("name", |r: &Sub| RowValue::text(r.name)).with_header("Name"),
            Column::new("score", |r: &Sub| RowValue::number(r.score))
                .with_header("Score")
                .with_groupable(false),
            Column::new("id", |_: &Sub| RowValue::Empty).with_sortable(false),
        ]
    }

    #[test]
    fn test_duplicate_keys_rejected_at_configuration_time() {
        let mut columns = test_columns();
        columns.push(Column::new("name", |r: &Sub| RowValue::text(r.name)));

        let err = ColumnSet::new(columns).err();
        assert_eq!(err, Some(ConfigError::DuplicateColumn("name".to_string())));
    }

    #[test]
    fn test_require_unknown_column() {
        let columns = ColumnSet::new(test_columns()).unwrap();
        assert!(columns.get("name").is_some());
        assert_eq!(
            columns.require("missing").err(),
            Some(ConfigError::UnknownColumn("missing".to_string()))
        );
    }

    #[test]
    fn test_validate_sort_flags() {
        let columns = ColumnSet::new(test_columns()).unwrap();

        let ok = SortSpec::by("name", SortDirection::Ascending);
        assert!(columns.validate_sort(&ok).is_ok());

        let bad = SortSpec::by("id", SortDirection::Ascending);
        assert_eq!(
            columns.validate_sort(&bad).err(),
            Some(ConfigError::NotSortable("id".to_string()))
        );
    }

    #[test]
    fn test_validate_group_flags() {
        let columns = ColumnSet::new(test_columns()).unwrap();

        let bad = GroupSpec::by(["score"]);
        assert_eq!(
            columns.validate_group(&bad).err(),
            Some(ConfigError::NotGroupable("score".to_string()))
        );
    }

    #[test]
    fn test_sort_toggle_cycle() {
        let mut spec = SortSpec::new();

        spec.toggle("name");
        assert_eq!(spec.direction_of("name"), Some(SortDirection::Ascending));

        spec.toggle("name");
        assert_eq!(spec.direction_of("name"), Some(SortDirection::Descending));

        spec.toggle("name");
        assert!(spec.is_empty());
    }

    #[test]
    fn test_sort_toggle_replaces_previous_column() {
        let mut spec = SortSpec::by("name", SortDirection::Descending);
        spec.toggle("score");

        assert_eq!(spec.keys.len(), 1);
        assert_eq!(spec.direction_of("score"), Some(SortDirection::Ascending));
        assert_eq!(spec.direction_of("name"), None);
    }

    #[test]
    fn test_group_toggle_adds_innermost_and_removes() {
        let mut spec = GroupSpec::by(["series"]);

        spec.toggle("language");
        assert_eq!(spec.columns, vec!["series", "language"]);

        spec.toggle("series");
        assert_eq!(spec.columns, vec!["language"]);
    }

    #[test]
    fn test_render_uses_custom_renderer() {
        let column = Column::new("score", |r: &Sub| RowValue::number(r.score))
            .with_renderer(|value, record: &Sub| format!("{} ({})", value.display(), record.name));

        let record = Sub { name: "movie", score: 87.0 };
        let value = column.value_of(&record);
        assert_eq!(column.render(&value, &record), "87 (movie)");
    }
}
