//! Load service - bulk ingestion of users and student records
//!
//! Loads are two-pass and all-or-nothing: pass one validates every
//! candidate field-by-field, pass two rejects the whole batch on any id
//! collision (within the batch or against the store), and only then does a
//! single transactional save run. No partial state is ever visible, not
//! even to readers racing the load.

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::adapters::{CsvUserSource, JsonRecordSource, JsonUserSource};
use crate::domain::result::{Error, Result};
use crate::domain::{
    ClassStatus, College, EntryKind, LedgerEntry, Role, StudentRecord, User,
};
use crate::ports::{RawStudentRecord, RawUser, RecordSource, UserSource};
use crate::ports::BillingStore;

/// Outcome of a bulk load
#[derive(Debug, Serialize)]
pub struct LoadResult {
    /// Candidates discovered in the source
    pub discovered: usize,
    /// Users or records persisted (0 in preview mode)
    pub loaded: usize,
    /// Ledger entries persisted alongside records (0 for user loads)
    pub entries_loaded: usize,
    /// Ledger entries skipped because their fingerprint already exists
    pub skipped_entries: usize,
    /// Whether this was a preview (validated, nothing persisted)
    pub preview: bool,
}

/// Bulk loader for users and student records
pub struct LoadService {
    store: Arc<dyn BillingStore>,
}

impl LoadService {
    pub fn new(store: Arc<dyn BillingStore>) -> Self {
        Self { store }
    }

    /// Load users from a file, dispatching on the extension
    pub fn load_users(&self, path: &Path, preview: bool) -> Result<LoadResult> {
        match extension_of(path) {
            Some("json") => self.load_users_from(&JsonUserSource::new(path), preview),
            Some("csv") => self.load_users_from(&CsvUserSource::new(path), preview),
            other => Err(Error::malformed_source(format!(
                "unsupported user source format '{}'",
                other.unwrap_or("")
            ))),
        }
    }

    /// Load users from any source
    pub fn load_users_from(&self, source: &dyn UserSource, preview: bool) -> Result<LoadResult> {
        let raw = source.read_users()?;

        // Pass 1: field validation
        let mut users = Vec::with_capacity(raw.len());
        for candidate in &raw {
            users.push(validate_user(candidate)?);
        }

        // Pass 2: duplicate ids, within the batch and against the store
        let mut seen = HashSet::new();
        for user in &users {
            if !seen.insert(user.id.clone()) {
                return Err(Error::DuplicateUser(user.id.clone()));
            }
            if self.store.find_user(&user.id)?.is_some() {
                return Err(Error::DuplicateUser(user.id.clone()));
            }
        }

        let loaded = if preview {
            0
        } else {
            self.store.save_users(&users)?;
            users.len()
        };

        Ok(LoadResult {
            discovered: raw.len(),
            loaded,
            entries_loaded: 0,
            skipped_entries: 0,
            preview,
        })
    }

    /// Load student records (with nested ledger entries) from a file
    pub fn load_records(&self, path: &Path, preview: bool) -> Result<LoadResult> {
        match extension_of(path) {
            Some("json") => self.load_records_from(&JsonRecordSource::new(path), preview),
            other => Err(Error::malformed_source(format!(
                "unsupported record source format '{}'",
                other.unwrap_or("")
            ))),
        }
    }

    /// Load student records from any source
    pub fn load_records_from(
        &self,
        source: &dyn RecordSource,
        preview: bool,
    ) -> Result<LoadResult> {
        let raw = source.read_records()?;

        // Pass 1: field validation, including the nested ledger entries
        let mut records = Vec::with_capacity(raw.len());
        let mut entries: Vec<LedgerEntry> = Vec::new();
        let mut skipped_entries = 0usize;
        let mut batch_fingerprints = HashSet::new();

        for candidate in &raw {
            let (record, record_entries) = self.validate_record(candidate)?;
            records.push(record);

            for entry in record_entries {
                // Fingerprints make record re-ingestion idempotent: an entry
                // already present in the batch or the store is skipped, not
                // doubled.
                let fp = entry.fingerprint.clone().unwrap_or_default();
                if !batch_fingerprints.insert(fp.clone())
                    || self.store.entry_exists_by_fingerprint(&fp)?
                {
                    skipped_entries += 1;
                    continue;
                }
                entries.push(entry);
            }
        }

        // Pass 2: duplicate records, within the batch and against the store
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.user_id.clone()) {
                return Err(Error::DuplicateRecord(record.user_id.clone()));
            }
            if self.store.record_by_user(&record.user_id)?.is_some() {
                return Err(Error::DuplicateRecord(record.user_id.clone()));
            }
        }

        let (loaded, entries_loaded) = if preview {
            (0, 0)
        } else {
            self.store.save_records(&records, &entries)?;
            (records.len(), entries.len())
        };

        Ok(LoadResult {
            discovered: raw.len(),
            loaded,
            entries_loaded,
            skipped_entries,
            preview,
        })
    }

    /// Validate one raw record into a domain record plus its ledger entries
    fn validate_record(
        &self,
        raw: &RawStudentRecord,
    ) -> Result<(StudentRecord, Vec<LedgerEntry>)> {
        let id = raw.id.trim();
        if id.is_empty() {
            return Err(Error::invalid_record("record user id is empty"));
        }

        let owner = self
            .store
            .find_user(id)?
            .ok_or_else(|| Error::invalid_record(format!("no user {} for record", id)))?;
        if owner.role != Role::Student {
            return Err(Error::invalid_record(format!(
                "user {} is not a student",
                id
            )));
        }

        let class_status = ClassStatus::from_str(&raw.class_status)
            .map_err(|e| Error::invalid_record(format!("record {}: {}", id, e)))?;

        let enrolled_since = match &raw.enrolled_since {
            Some(s) => Some(parse_iso_date(s).map_err(|e| {
                Error::invalid_record(format!("record {}: enrolledSince {}", id, e))
            })?),
            None => None,
        };

        let mut record = StudentRecord::new(id, class_status);
        record.resident = raw.resident;
        record.enrolled_since = enrolled_since;

        let mut entries = Vec::with_capacity(raw.entries.len());
        for raw_entry in &raw.entries {
            let kind = EntryKind::from_str(&raw_entry.kind)
                .map_err(|e| Error::invalid_record(format!("record {}: {}", id, e)))?;
            let amount = Decimal::from_str(raw_entry.amount.trim()).map_err(|_| {
                Error::invalid_record(format!(
                    "record {}: unparseable amount '{}'",
                    id, raw_entry.amount
                ))
            })?;
            if amount <= Decimal::ZERO {
                return Err(Error::invalid_record(format!(
                    "record {}: entry amount must be positive",
                    id
                )));
            }
            let date = parse_iso_date(&raw_entry.date)
                .map_err(|e| Error::invalid_record(format!("record {}: date {}", id, e)))?;

            let mut entry = LedgerEntry::new(id, kind, amount, date);
            entry.note = raw_entry.note.clone();
            entry.ensure_fingerprint();
            entries.push(entry);
        }

        Ok((record, entries))
    }
}

/// Validate one raw user into a domain user
fn validate_user(raw: &RawUser) -> Result<User> {
    let id = raw.id.trim();
    if id.is_empty() {
        return Err(Error::invalid_user("user id is empty"));
    }

    let role = Role::from_str(&raw.role)
        .map_err(|e| Error::invalid_user(format!("user {}: {}", id, e)))?;
    let college = College::from_str(&raw.college)
        .map_err(|e| Error::invalid_user(format!("user {}: {}", id, e)))?;

    Ok(User::new(id, role, college))
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

fn parse_iso_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a YYYY-MM-DD date", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_user_rejects_bad_fields() {
        let ok = RawUser {
            id: "s1".into(),
            role: "STUDENT".into(),
            college: "ENGINEERING".into(),
        };
        assert!(validate_user(&ok).is_ok());

        let blank_id = RawUser { id: "  ".into(), ..ok.clone() };
        assert!(matches!(validate_user(&blank_id), Err(Error::InvalidUser(_))));

        let bad_role = RawUser { role: "WIZARD".into(), ..ok.clone() };
        assert!(matches!(validate_user(&bad_role), Err(Error::InvalidUser(_))));

        let bad_college = RawUser { college: "HOGWARTS".into(), ..ok };
        assert!(matches!(
            validate_user(&bad_college),
            Err(Error::InvalidUser(_))
        ));
    }

    #[test]
    fn test_parse_iso_date() {
        assert!(parse_iso_date("2026-01-15").is_ok());
        assert!(parse_iso_date("01/15/2026").is_err());
    }
}
