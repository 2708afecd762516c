//! Bulk source ports
//!
//! Defines the interface for reading candidate users and student records
//! from external sources (JSON files, CSV files, demo data). Sources hand
//! back stringly-typed raw records; the load service validates them into
//! domain types, so a source adapter never needs to know the enumerated
//! field sets.

use serde::Deserialize;

use crate::domain::result::Result;

/// A candidate user as read from a source, before validation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    pub id: String,
    pub role: String,
    pub college: String,
}

/// A candidate ledger entry nested in a student record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLedgerEntry {
    pub kind: String,
    pub amount: String,
    #[serde(default)]
    pub note: Option<String>,
    pub date: String,
}

/// A candidate student record as read from a source, before validation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStudentRecord {
    pub id: String,
    pub class_status: String,
    #[serde(default)]
    pub resident: bool,
    #[serde(default)]
    pub enrolled_since: Option<String>,
    #[serde(default)]
    pub entries: Vec<RawLedgerEntry>,
}

/// Source of candidate users
///
/// Implementations resolve a named resource to a sequence of raw user
/// records; the loader is agnostic to the concrete encoding.
pub trait UserSource {
    /// Source name for logging (e.g. "json", "csv", "demo")
    fn name(&self) -> &str;

    /// Read all candidate users
    fn read_users(&self) -> Result<Vec<RawUser>>;
}

/// Source of candidate student records
pub trait RecordSource {
    /// Source name for logging
    fn name(&self) -> &str;

    /// Read all candidate student records
    fn read_records(&self) -> Result<Vec<RawStudentRecord>>;
}
