// Statistics Aggregator
// One-shot snapshot of the loaded table: totals, per-bank, per-year and bank x sentiment counts

use crate::data::CommentTable;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankCount {
    pub bank: String,
    pub count: usize,
}

/// Aggregates computed once at startup
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsSnapshot {
    pub total_comments: usize,

    /// Descending count, ties in first-seen order
    pub comments_by_bank: Vec<BankCount>,

    pub comments_by_year: BTreeMap<i32, usize>,

    /// bank -> sentiment -> count, zero-filled over every sentiment in the table.
    /// Empty when the source has no sentiment column.
    pub sentiment_by_bank: BTreeMap<String, BTreeMap<String, usize>>,

    pub computed_at: DateTime<Utc>,
}

impl StatisticsSnapshot {
    pub fn bank_count(&self, bank: &str) -> Option<usize> {
        self.comments_by_bank
            .iter()
            .find(|b| b.bank == bank)
            .map(|b| b.count)
    }
}

pub fn compute_statistics(table: &CommentTable) -> StatisticsSnapshot {
    let comments_by_bank = value_counts(table.records().iter().map(|r| r.name.as_str()))
        .into_iter()
        .map(|(bank, count)| BankCount {
            bank: bank.to_string(),
            count,
        })
        .collect();

    let mut comments_by_year = BTreeMap::new();
    for record in table.records() {
        *comments_by_year.entry(record.year).or_insert(0) += 1;
    }

    let sentiment_by_bank = if table.has_sentiment() {
        crosstab_sentiment(table)
    } else {
        BTreeMap::new()
    };

    StatisticsSnapshot {
        total_comments: table.len(),
        comments_by_bank,
        comments_by_year,
        sentiment_by_bank,
        computed_at: Utc::now(),
    }
}

fn crosstab_sentiment(table: &CommentTable) -> BTreeMap<String, BTreeMap<String, usize>> {
    let sentiments: BTreeSet<&str> = table
        .records()
        .iter()
        .filter_map(|r| r.sentiment.as_deref())
        .collect();

    let mut crosstab: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for record in table.records() {
        // Banks whose rows all lack a sentiment do not appear, like a grouped count would
        let Some(sentiment) = record.sentiment.as_deref() else {
            continue;
        };
        let row = crosstab.entry(record.name.clone()).or_insert_with(|| {
            sentiments.iter().map(|s| (s.to_string(), 0)).collect()
        });
        *row.entry(sentiment.to_string()).or_insert(0) += 1;
    }

    crosstab
}

/// Count occurrences, ordered by descending count with ties kept in first-seen order
pub(crate) fn value_counts<'a, I>(values: I) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(&'a str, usize)> = Vec::new();

    for value in values {
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    // sort_by is stable, so equal counts keep their first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CommentRecord;

    fn example_table() -> CommentTable {
        CommentTable::new(
            vec![
                CommentRecord::new("BankA", 2020, Some("pos")),
                CommentRecord::new("BankA", 2021, Some("neg")),
                CommentRecord::new("BankB", 2020, Some("pos")),
            ],
            true,
        )
    }

    #[test]
    fn test_example_snapshot() {
        let stats = compute_statistics(&example_table());

        assert_eq!(stats.total_comments, 3);
        assert_eq!(stats.bank_count("BankA"), Some(2));
        assert_eq!(stats.bank_count("BankB"), Some(1));
        assert_eq!(stats.bank_count("BankC"), None);
        assert_eq!(
            stats.comments_by_year,
            BTreeMap::from([(2020, 2), (2021, 1)])
        );
    }

    #[test]
    fn test_totals_are_consistent() {
        let csv = "Name,Year\nX,2018\nY,2019\nX,2019\nZ,2020\nY,2020\nX,2020\nW,2021\n";
        let table = CommentTable::from_reader(csv.as_bytes()).unwrap();
        let stats = compute_statistics(&table);

        let bank_sum: usize = stats.comments_by_bank.iter().map(|b| b.count).sum();
        let year_sum: usize = stats.comments_by_year.values().sum();

        assert_eq!(stats.total_comments, table.len());
        assert_eq!(bank_sum, table.len(), "bank counts must sum to row count");
        assert_eq!(year_sum, table.len(), "year counts must sum to row count");
    }

    #[test]
    fn test_bank_order_count_desc_then_first_seen() {
        let table = CommentTable::new(
            vec![
                CommentRecord::new("Late", 2020, None),
                CommentRecord::new("Big", 2020, None),
                CommentRecord::new("Tie", 2020, None),
                CommentRecord::new("Big", 2021, None),
            ],
            false,
        );
        let stats = compute_statistics(&table);

        let order: Vec<&str> = stats
            .comments_by_bank
            .iter()
            .map(|b| b.bank.as_str())
            .collect();
        assert_eq!(order, vec!["Big", "Late", "Tie"]);
    }

    #[test]
    fn test_sentiment_crosstab_zero_filled() {
        let stats = compute_statistics(&example_table());

        let bank_b = &stats.sentiment_by_bank["BankB"];
        assert_eq!(bank_b["pos"], 1);
        assert_eq!(bank_b["neg"], 0, "absent combinations should be zero-filled");

        let bank_a = &stats.sentiment_by_bank["BankA"];
        assert_eq!(bank_a["pos"], 1);
        assert_eq!(bank_a["neg"], 1);
    }

    #[test]
    fn test_no_sentiment_column_degrades_to_empty() {
        let table = CommentTable::new(vec![CommentRecord::new("BankA", 2020, None)], false);
        let stats = compute_statistics(&table);

        assert!(stats.sentiment_by_bank.is_empty());
        assert_eq!(stats.total_comments, 1);
    }

    #[test]
    fn test_empty_table() {
        let stats = compute_statistics(&CommentTable::default());

        assert_eq!(stats.total_comments, 0);
        assert!(stats.comments_by_bank.is_empty());
        assert!(stats.comments_by_year.is_empty());
    }

    #[test]
    fn test_value_counts() {
        let counts = value_counts(["b", "a", "b", "c", "a", "b"]);
        assert_eq!(counts, vec![("b", 3), ("a", 2), ("c", 1)]);
    }
}
