//! The score history: one record per calendar day, kept in date order.

use crate::errors::LedgerError;
use crate::models::{ScoreRecord, UpsertOutcome};
use chrono::NaiveDate;

pub const EXPORT_FILE_NAME: &str = "daily_performance.json";
pub const EXPORT_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    records: Vec<ScoreRecord>,
}

/// A downloadable snapshot of the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl Ledger {
    /// Builds a ledger from records in any order. A later record for a date
    /// already seen replaces the earlier one.
    pub fn from_records(records: impl IntoIterator<Item = ScoreRecord>) -> Self {
        let mut ledger = Self::default();
        for record in records {
            ledger.upsert(record);
        }
        ledger
    }

    /// Parses a stored blob: a JSON array of `{date, score}` objects.
    pub fn decode(bytes: &[u8]) -> Result<Self, LedgerError> {
        let records: Vec<ScoreRecord> = serde_json::from_slice(bytes)?;
        Ok(Self::from_records(records))
    }

    pub fn encode(&self) -> Result<Vec<u8>, LedgerError> {
        Ok(serde_json::to_vec_pretty(&self.records)?)
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&ScoreRecord> {
        self.position(date).ok().map(|index| &self.records[index])
    }

    /// Inserts the record, or replaces the one already stored for its date.
    pub fn upsert(&mut self, record: ScoreRecord) -> UpsertOutcome {
        match self.position(record.date) {
            Ok(index) => {
                self.records[index] = record;
                UpsertOutcome::Updated
            }
            Err(index) => {
                self.records.insert(index, record);
                UpsertOutcome::Inserted
            }
        }
    }

    pub fn export(&self) -> Result<ExportArtifact, LedgerError> {
        if self.records.is_empty() {
            return Err(LedgerError::NothingToExport);
        }

        Ok(ExportArtifact {
            file_name: EXPORT_FILE_NAME,
            content_type: EXPORT_CONTENT_TYPE,
            body: serde_json::to_string_pretty(&self.records)?,
        })
    }

    fn position(&self, date: NaiveDate) -> Result<usize, usize> {
        self.records.binary_search_by(|record| record.date.cmp(&date))
    }
}
