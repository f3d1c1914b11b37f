use serde::Serialize;
use std::fmt;

/// Outcome of loading one CSV file into one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableLoadReport {
    pub table: String,
    /// Rows written by the committed transaction
    pub inserted: usize,
    /// Rows whose insert failed and were left out
    pub skipped: usize,
    /// The row cap stopped the stream before the end of the file
    pub truncated: bool,
}

impl TableLoadReport {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            inserted: 0,
            skipped: 0,
            truncated: false,
        }
    }

    /// Rows taken from the stream, whether or not they were written
    pub fn accepted(&self) -> usize {
        self.inserted + self.skipped
    }
}

impl fmt::Display for TableLoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} inserted, {} skipped",
            self.table, self.inserted, self.skipped
        )?;
        if self.truncated {
            write!(f, " (row cap reached)")?;
        }
        Ok(())
    }
}

/// Per-table reports for a full run, in load order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub tables: Vec<TableLoadReport>,
}

impl LoadSummary {
    pub fn total_inserted(&self) -> usize {
        self.tables.iter().map(|t| t.inserted).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.tables.iter().map(|t| t.skipped).sum()
    }

    pub fn table(&self, name: &str) -> Option<&TableLoadReport> {
        self.tables.iter().find(|t| t.table == name)
    }
}
