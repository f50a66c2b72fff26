use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Dropdown value meaning "no bank filter applied"
pub const ALL_SENTINEL: &str = "Tout";

/// One row of the comments CSV
/// Only the columns the dashboard reads are mapped; anything else in the file is ignored
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Year")]
    pub year: i32,

    /// Empty cells deserialize to None and are left out of sentiment counts
    #[serde(default)]
    pub sentiment: Option<String>,
}

impl CommentRecord {
    pub fn new(name: &str, year: i32, sentiment: Option<&str>) -> Self {
        CommentRecord {
            name: name.to_string(),
            year,
            sentiment: sentiment.map(str::to_string),
        }
    }
}

/// The loaded dataset. Immutable after load.
#[derive(Debug, Clone, Default)]
pub struct CommentTable {
    records: Vec<CommentRecord>,
    has_sentiment: bool,
}

impl CommentTable {
    pub fn new(records: Vec<CommentRecord>, has_sentiment: bool) -> Self {
        CommentTable {
            records,
            has_sentiment,
        }
    }

    /// Parse a CSV stream with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);

        let headers = rdr.headers()?.clone();
        for required in ["Name", "Year"] {
            if !headers.iter().any(|h| h == required) {
                return Err(DashboardError::MissingColumn(required));
            }
        }
        let has_sentiment = headers.iter().any(|h| h == "sentiment");

        let mut records = Vec::new();
        for result in rdr.deserialize() {
            let record: CommentRecord = result?;
            records.push(record);
        }

        Ok(CommentTable::new(records, has_sentiment))
    }

    pub fn records(&self) -> &[CommentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the source header carried a `sentiment` column
    pub fn has_sentiment(&self) -> bool {
        self.has_sentiment
    }

    /// Distinct bank names in first-seen order
    pub fn banks(&self) -> Vec<String> {
        let mut banks: Vec<String> = Vec::new();
        for record in &self.records {
            if !banks.contains(&record.name) {
                banks.push(record.name.clone());
            }
        }
        banks
    }

    /// Rows selected by a bank filter
    pub fn filtered<'a>(
        &'a self,
        filter: &'a BankFilter,
    ) -> impl Iterator<Item = &'a CommentRecord> + 'a {
        self.records.iter().filter(move |r| filter.matches(r))
    }
}

/// Load the comments CSV from disk
pub fn load_csv(csv_path: &Path) -> Result<CommentTable> {
    let file = File::open(csv_path).map_err(|source| DashboardError::Io {
        path: csv_path.to_path_buf(),
        source,
    })?;

    CommentTable::from_reader(file)
}

/// Bank selection coming from a dropdown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BankFilter {
    #[default]
    All,
    Bank(String),
}

impl BankFilter {
    /// Map a dropdown value to a filter; the sentinel and an empty value select everything.
    /// Bank names are kept verbatim so they match `Name` cells exactly.
    pub fn from_selection(value: &str) -> Self {
        if value.is_empty() || value == ALL_SENTINEL {
            BankFilter::All
        } else {
            BankFilter::Bank(value.to_string())
        }
    }

    pub fn matches(&self, record: &CommentRecord) -> bool {
        match self {
            BankFilter::All => true,
            BankFilter::Bank(name) => &record.name == name,
        }
    }
}

impl fmt::Display for BankFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankFilter::All => f.write_str(ALL_SENTINEL),
            BankFilter::Bank(name) => f.write_str(name),
        }
    }
}
