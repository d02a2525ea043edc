//! FILENAME: table-engine/src/sort.rs
//! Sort Engine - stable multi-key ordering over records.
//!
//! Sort keys are extracted from the records once, up front; accessors
//! never run inside the comparator.

use std::cmp::Ordering;

use table_model::RowValue;

use crate::definition::{Column, ColumnSet, SortDirection, SortSpec};
use crate::error::ConfigError;

/// Computes the sorted permutation of `rows` under `spec`.
///
/// The sort is stable: rows whose keys compare equal keep their relative
/// input order, regardless of direction. Descending reverses each key
/// comparison but never the tie-break. An empty spec is the identity
/// permutation.
pub fn sort_order<R>(
    rows: &[R],
    spec: &SortSpec,
    columns: &ColumnSet<R>,
) -> Result<Vec<usize>, ConfigError> {
    let mut order: Vec<usize> = (0..rows.len()).collect();

    let spec_columns = resolve_spec(spec, columns)?;
    if spec_columns.is_empty() {
        return Ok(order);
    }

    // One key vector per row, in spec order.
    let keys: Vec<Vec<RowValue>> = rows
        .iter()
        .map(|row| spec_columns.iter().map(|(c, _)| c.value_of(row)).collect())
        .collect();

    order.sort_by(|&a, &b| compare_keys(&keys[a], &keys[b], &spec_columns));
    Ok(order)
}

/// Returns the records themselves in sorted order.
pub fn sorted<'r, R>(
    rows: &'r [R],
    spec: &SortSpec,
    columns: &ColumnSet<R>,
) -> Result<Vec<&'r R>, ConfigError> {
    Ok(sort_order(rows, spec, columns)?
        .into_iter()
        .map(|i| &rows[i])
        .collect())
}

fn resolve_spec<'c, R>(
    spec: &SortSpec,
    columns: &'c ColumnSet<R>,
) -> Result<Vec<(&'c Column<R>, SortDirection)>, ConfigError> {
    let mut resolved = Vec::with_capacity(spec.keys.len());
    for key in &spec.keys {
        let column = columns.require(&key.column)?;
        if !column.sortable {
            return Err(ConfigError::NotSortable(key.column.clone()));
        }
        resolved.push((column, key.direction));
    }
    Ok(resolved)
}

fn compare_keys<R>(
    a: &[RowValue],
    b: &[RowValue],
    spec_columns: &[(&Column<R>, SortDirection)],
) -> Ordering {
    for (i, (_, direction)) in spec_columns.iter().enumerate() {
        let ord = direction.apply(a[i].total_cmp(&b[i]));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::SortKey;
    use table_model::RowValue;

    struct Sub {
        name: &'static str,
        lang: &'static str,
        score: f64,
    }

    fn create_test_rows() -> Vec<Sub> {
        vec![
            Sub { name: "A", lang: "en", score: 70.0 },
            Sub { name: "B", lang: "en", score: 90.0 },
            Sub { name: "C", lang: "fr", score: 90.0 },
            Sub { name: "D", lang: "de", score: 70.0 },
        ]
    }

    fn create_test_columns() -> ColumnSet<Sub> {
        ColumnSet::new(vec![
            Column::new("name", |r: &Sub| RowValue::text(r.name)),
            Column::new("lang", |r: &Sub| RowValue::text(r.lang)),
            Column::new("score", |r: &Sub| RowValue::number(r.score)),
            Column::new("hidden", |_: &Sub| RowValue::Empty).with_sortable(false),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_spec_is_identity() {
        let rows = create_test_rows();
        let columns = create_test_columns();

        let order = sort_order(&rows, &SortSpec::new(), &columns).unwrap();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_descending_single_key() {
        let rows = create_test_rows();
        let columns = create_test_columns();

        let spec = SortSpec::by("name", SortDirection::Descending);
        let names: Vec<&str> = sorted(&rows, &spec, &columns)
            .unwrap()
            .iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["D", "C", "B", "A"]);
    }

    #[test]
    fn test_stability_for_equal_keys() {
        let rows = create_test_rows();
        let columns = create_test_columns();

        // Two rows score 70 (A, D) and two score 90 (B, C); equal-keyed
        // rows must keep input order even under a descending sort.
        let spec = SortSpec::by("score", SortDirection::Descending);
        let names: Vec<&str> = sorted(&rows, &spec, &columns)
            .unwrap()
            .iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn test_later_keys_break_ties() {
        let rows = create_test_rows();
        let columns = create_test_columns();

        let spec = SortSpec {
            keys: vec![SortKey::ascending("score"), SortKey::descending("name")],
        };
        let names: Vec<&str> = sorted(&rows, &spec, &columns)
            .unwrap()
            .iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["D", "A", "C", "B"]);
    }

    #[test]
    fn test_unknown_column_fails() {
        let rows = create_test_rows();
        let columns = create_test_columns();

        let spec = SortSpec::by("missing", SortDirection::Ascending);
        assert_eq!(
            sort_order(&rows, &spec, &columns).err(),
            Some(ConfigError::UnknownColumn("missing".to_string()))
        );
    }

    #[test]
    fn test_unsortable_column_fails_rather_than_ignoring() {
        let rows = create_test_rows();
        let columns = create_test_columns();

        let spec = SortSpec::by("hidden", SortDirection::Ascending);
        assert_eq!(
            sort_order(&rows, &spec, &columns).err(),
            Some(ConfigError::NotSortable("hidden".to_string()))
        );
    }
}
