//! FILENAME: table-engine/src/aggregate.rs
//! Stock aggregate functions for columns that opt into group summaries.
//!
//! Numeric statistics skip non-numeric values rather than coercing them;
//! a group with no numeric values at all aggregates to `Empty`, which
//! renders as an empty cell instead of a misleading zero.

use table_model::RowValue;

/// Sum of the numeric values in the group.
pub fn sum(values: &[RowValue]) -> RowValue {
    let mut total = 0.0;
    let mut seen = false;
    for value in values {
        if let Some(n) = value.as_f64() {
            total += n;
            seen = true;
        }
    }
    if seen {
        RowValue::number(total)
    } else {
        RowValue::Empty
    }
}

/// Count of non-empty values in the group.
pub fn count(values: &[RowValue]) -> RowValue {
    RowValue::number(values.iter().filter(|v| !v.is_empty()).count() as f64)
}

/// Mean of the numeric values in the group.
pub fn average(values: &[RowValue]) -> RowValue {
    let mut total = 0.0;
    let mut count = 0u64;
    for value in values {
        if let Some(n) = value.as_f64() {
            total += n;
            count += 1;
        }
    }
    if count > 0 {
        RowValue::number(total / count as f64)
    } else {
        RowValue::Empty
    }
}

/// Smallest numeric value in the group.
pub fn min(values: &[RowValue]) -> RowValue {
    fold_numeric(values, f64::min)
}

/// Largest numeric value in the group.
pub fn max(values: &[RowValue]) -> RowValue {
    fold_numeric(values, f64::max)
}

fn fold_numeric(values: &[RowValue], pick: fn(f64, f64) -> f64) -> RowValue {
    let mut acc: Option<f64> = None;
    for value in values {
        if let Some(n) = value.as_f64() {
            acc = Some(acc.map_or(n, |m| pick(m, n)));
        }
    }
    match acc {
        Some(n) => RowValue::number(n),
        None => RowValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed() -> Vec<RowValue> {
        vec![
            RowValue::number(10.0),
            RowValue::text("n/a"),
            RowValue::number(30.0),
            RowValue::Empty,
            RowValue::number(20.0),
        ]
    }

    #[test]
    fn test_numeric_aggregates_skip_non_numbers() {
        let values = mixed();
        assert_eq!(sum(&values), RowValue::number(60.0));
        assert_eq!(average(&values), RowValue::number(20.0));
        assert_eq!(min(&values), RowValue::number(10.0));
        assert_eq!(max(&values), RowValue::number(30.0));
    }

    #[test]
    fn test_count_includes_text_but_not_empty() {
        assert_eq!(count(&mixed()), RowValue::number(4.0));
    }

    #[test]
    fn test_no_numeric_values_yields_empty() {
        let values = vec![RowValue::text("a"), RowValue::Empty];
        assert_eq!(sum(&values), RowValue::Empty);
        assert_eq!(average(&values), RowValue::Empty);
        assert_eq!(min(&values), RowValue::Empty);
        assert_eq!(max(&values), RowValue::Empty);
    }
}
