//! FILENAME: table-model/src/value.rs
//! Row values - the normalized vocabulary column accessors produce.
//!
//! Records are opaque to the engine; accessors project each record onto
//! these values, which then serve three roles:
//! - Sort keys (total order across all variants)
//! - Group keys (hashable, so values can bucket rows and identify nodes)
//! - Cell payloads (carried into the rendered view)

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Wrapper around f64 that implements Eq and Hash for use as a map key.
/// NaN values are treated as equal to each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            // All NaN values hash to the same thing
            u64::MAX.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

/// A single cell value as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowValue {
    Empty,
    Number(OrderedFloat),
    Text(String),
    Boolean(bool),
}

impl RowValue {
    pub fn number(value: f64) -> Self {
        RowValue::Number(OrderedFloat(value))
    }

    pub fn text(value: impl Into<String>) -> Self {
        RowValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RowValue::Empty)
    }

    /// Returns the numeric payload, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RowValue::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// Total order over all variants: Empty < Number < Text < Boolean.
    /// Numbers compare numerically (NaN sorts as equal to itself), text
    /// lexicographically, booleans false-before-true.
    pub fn total_cmp(&self, other: &RowValue) -> Ordering {
        match (self, other) {
            (RowValue::Empty, RowValue::Empty) => Ordering::Equal,
            (RowValue::Empty, _) => Ordering::Less,
            (_, RowValue::Empty) => Ordering::Greater,

            (RowValue::Number(na), RowValue::Number(nb)) => {
                na.as_f64().partial_cmp(&nb.as_f64()).unwrap_or(Ordering::Equal)
            }
            (RowValue::Number(_), _) => Ordering::Less,
            (_, RowValue::Number(_)) => Ordering::Greater,

            (RowValue::Text(ta), RowValue::Text(tb)) => ta.cmp(tb),
            (RowValue::Text(_), _) => Ordering::Less,
            (_, RowValue::Text(_)) => Ordering::Greater,

            (RowValue::Boolean(ba), RowValue::Boolean(bb)) => ba.cmp(bb),
        }
    }

    /// Display label for group headers. Empty values get an explicit
    /// "(blank)" marker so an empty-keyed group is still clickable.
    pub fn label(&self) -> String {
        match self {
            RowValue::Empty => "(blank)".to_string(),
            RowValue::Number(n) => format!("{}", n.as_f64()),
            RowValue::Text(s) => s.clone(),
            RowValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }

    /// Default cell rendering. Unlike `label`, empty cells render as
    /// nothing at all.
    pub fn display(&self) -> String {
        match self {
            RowValue::Empty => String::new(),
            RowValue::Number(n) => format!("{}", n.as_f64()),
            RowValue::Text(s) => s.clone(),
            RowValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }
}

impl From<f64> for RowValue {
    fn from(value: f64) -> Self {
        RowValue::number(value)
    }
}

impl From<i64> for RowValue {
    fn from(value: i64) -> Self {
        RowValue::number(value as f64)
    }
}

impl From<&str> for RowValue {
    fn from(value: &str) -> Self {
        RowValue::Text(value.to_string())
    }
}

impl From<String> for RowValue {
    fn from(value: String) -> Self {
        RowValue::Text(value)
    }
}

impl From<bool> for RowValue {
    fn from(value: bool) -> Self {
        RowValue::Boolean(value)
    }
}

impl<T: Into<RowValue>> From<Option<T>> for RowValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => RowValue::Empty,
        }
    }
}
