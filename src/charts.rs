// Chart Builders
// Bar-chart specifications for the Commentaires and Sentiments tabs.
// Builders never fail: a chart with nothing to draw comes back as ChartOutcome::Empty with the reason.

use crate::data::{BankFilter, CommentTable};
use crate::stats::value_counts;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Plotly's qualitative palette; categories past the tenth wrap around
pub const QUALITATIVE_PALETTE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

const COUNT_AXIS_TITLE: &str = "Nombre de Commentaires";

pub fn palette_color(index: usize) -> &'static str {
    QUALITATIVE_PALETTE[index % QUALITATIVE_PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    Outside,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub category: String,
    pub value: usize,
    pub color: &'static str,
    /// Value label drawn above the bar
    pub text: String,
}

impl Bar {
    fn new(category: String, value: usize, color: &'static str) -> Self {
        Bar {
            category,
            value,
            color,
            text: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub legend_title: String,
    pub text_position: TextPosition,
    pub bars: Vec<Bar>,
}

impl ChartSpec {
    fn new(title: String, x_title: &str, legend_title: &str) -> Self {
        ChartSpec {
            title,
            x_title: x_title.to_string(),
            y_title: COUNT_AXIS_TITLE.to_string(),
            legend_title: legend_title.to_string(),
            text_position: TextPosition::Outside,
            bars: Vec::new(),
        }
    }

    /// Sum of all bar heights
    pub fn total(&self) -> usize {
        self.bars.iter().map(|b| b.value).sum()
    }

    pub fn categories(&self) -> Vec<&str> {
        self.bars.iter().map(|b| b.category.as_str()).collect()
    }

    pub fn value_of(&self, category: &str) -> Option<usize> {
        self.bars
            .iter()
            .find(|b| b.category == category)
            .map(|b| b.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "column", rename_all = "snake_case")]
pub enum EmptyReason {
    /// The filter selected no rows, or none of them carried a value
    NoMatchingRows,
    MissingColumn(&'static str),
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::NoMatchingRows => f.write_str("no matching rows"),
            EmptyReason::MissingColumn(column) => write!(f, "missing column '{}'", column),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartOutcome {
    Ready { chart: ChartSpec },
    Empty { reason: EmptyReason, chart: ChartSpec },
}

impl ChartOutcome {
    fn empty(kind: ChartKind, filter: &BankFilter, chart: ChartSpec, reason: EmptyReason) -> Self {
        warn!("{} for {}: empty chart ({})", kind.name(), filter, reason);
        ChartOutcome::Empty { reason, chart }
    }

    pub fn chart(&self) -> &ChartSpec {
        match self {
            ChartOutcome::Ready { chart } | ChartOutcome::Empty { chart, .. } => chart,
        }
    }

    pub fn into_chart(self) -> ChartSpec {
        match self {
            ChartOutcome::Ready { chart } | ChartOutcome::Empty { chart, .. } => chart,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ChartOutcome::Ready { .. })
    }

    pub fn empty_reason(&self) -> Option<&EmptyReason> {
        match self {
            ChartOutcome::Ready { .. } => None,
            ChartOutcome::Empty { reason, .. } => Some(reason),
        }
    }
}

/// The two charts the dashboard can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    CommentsByYear,
    SentimentByBank,
}

impl ChartKind {
    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::CommentsByYear => "comments_by_year",
            ChartKind::SentimentByBank => "sentiment_by_bank",
        }
    }

    pub fn build(&self, table: &CommentTable, filter: &BankFilter) -> ChartOutcome {
        match self {
            ChartKind::CommentsByYear => comments_by_year(table, filter),
            ChartKind::SentimentByBank => sentiment_by_bank(table, filter),
        }
    }
}

/// Comment count per year, ascending, for one bank or all of them
pub fn comments_by_year(table: &CommentTable, filter: &BankFilter) -> ChartOutcome {
    let mut chart = ChartSpec::new(
        format!("Nombre de Commentaires par Année pour {}", filter),
        "Année",
        "Année",
    );

    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for record in table.filtered(filter) {
        *counts.entry(record.year).or_insert(0) += 1;
    }

    if counts.is_empty() {
        return ChartOutcome::empty(
            ChartKind::CommentsByYear,
            filter,
            chart,
            EmptyReason::NoMatchingRows,
        );
    }

    chart.bars = counts
        .into_iter()
        .enumerate()
        .map(|(i, (year, count))| Bar::new(year.to_string(), count, palette_color(i)))
        .collect();

    ChartOutcome::Ready { chart }
}

/// Sentiment distribution, most frequent first, colored in that order
pub fn sentiment_by_bank(table: &CommentTable, filter: &BankFilter) -> ChartOutcome {
    let mut chart = ChartSpec::new(
        format!("Distribution des Sentiments pour {}", filter),
        "Sentiment",
        "Sentiment",
    );

    if !table.has_sentiment() {
        return ChartOutcome::empty(
            ChartKind::SentimentByBank,
            filter,
            chart,
            EmptyReason::MissingColumn("sentiment"),
        );
    }

    let counts = value_counts(table.filtered(filter).filter_map(|r| r.sentiment.as_deref()));
    if counts.is_empty() {
        return ChartOutcome::empty(
            ChartKind::SentimentByBank,
            filter,
            chart,
            EmptyReason::NoMatchingRows,
        );
    }

    chart.bars = counts
        .into_iter()
        .enumerate()
        .map(|(i, (sentiment, count))| Bar::new(sentiment.to_string(), count, palette_color(i)))
        .collect();

    ChartOutcome::Ready { chart }
}
