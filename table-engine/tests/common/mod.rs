//! FILENAME: table-engine/tests/common/mod.rs
//! PURPOSE: Shared fixtures for the table engine integration tests.

use table_engine::{aggregate, Column, RowValue};

/// One row of a subtitle catalog, the kind of record the engine's host
/// application feeds it.
pub struct SubtitleRecord {
    pub series: &'static str,
    pub episode: f64,
    pub language: &'static str,
    pub provider: &'static str,
    pub score: f64,
}

pub fn catalog() -> Vec<SubtitleRecord> {
    vec![
        SubtitleRecord { series: "Northern Lights", episode: 1.0, language: "en", provider: "opensubs", score: 92.0 },
        SubtitleRecord { series: "Northern Lights", episode: 2.0, language: "en", provider: "subdivx", score: 88.0 },
        SubtitleRecord { series: "Northern Lights", episode: 1.0, language: "fr", provider: "opensubs", score: 75.0 },
        SubtitleRecord { series: "Harbor Tales", episode: 5.0, language: "en", provider: "subdivx", score: 81.0 },
        SubtitleRecord { series: "Harbor Tales", episode: 6.0, language: "de", provider: "opensubs", score: 67.0 },
        SubtitleRecord { series: "Harbor Tales", episode: 5.0, language: "fr", provider: "addicted", score: 90.0 },
    ]
}

pub fn catalog_columns() -> Vec<Column<SubtitleRecord>> {
    vec![
        Column::new("series", |r: &SubtitleRecord| RowValue::text(r.series))
            .with_header("Series"),
        Column::new("episode", |r: &SubtitleRecord| RowValue::number(r.episode))
            .with_header("Episode")
            .with_groupable(false),
        Column::new("language", |r: &SubtitleRecord| RowValue::text(r.language))
            .with_header("Language"),
        Column::new("provider", |r: &SubtitleRecord| RowValue::text(r.provider))
            .with_header("Provider"),
        Column::new("score", |r: &SubtitleRecord| RowValue::number(r.score))
            .with_header("Score")
            .with_aggregate(aggregate::average),
    ]
}
