//! Doctor service - store integrity checks

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use serde_json::json;

use crate::ports::BillingStore;

/// Doctor service for health checks
pub struct DoctorService {
    store: Arc<dyn BillingStore>,
}

impl DoctorService {
    pub fn new(store: Arc<dyn BillingStore>) -> Self {
        Self { store }
    }

    /// Run all health checks
    pub fn run_checks(&self) -> Result<DoctorResult> {
        let mut checks = HashMap::new();

        // Records whose user is missing
        let orphaned_records = self.store.orphaned_records()?;
        checks.insert(
            "orphaned_records".to_string(),
            CheckResult {
                status: if orphaned_records.is_empty() { "pass" } else { "error" }.to_string(),
                message: if orphaned_records.is_empty() {
                    "No orphaned student records found".to_string()
                } else {
                    format!(
                        "{} student record(s) reference missing users",
                        orphaned_records.len()
                    )
                },
                details: details_from(&orphaned_records, |id| json!({ "user_id": id })),
            },
        );

        // Ledger entries whose record is missing
        let orphaned_entries = self.store.orphaned_entries()?;
        checks.insert(
            "orphaned_entries".to_string(),
            CheckResult {
                status: if orphaned_entries.is_empty() { "pass" } else { "error" }.to_string(),
                message: if orphaned_entries.is_empty() {
                    "No orphaned ledger entries found".to_string()
                } else {
                    format!(
                        "{} ledger entr(ies) reference missing student records",
                        orphaned_entries.len()
                    )
                },
                details: details_from(&orphaned_entries, |s| {
                    // "entry_id:user_id" format
                    let parts: Vec<&str> = s.split(':').collect();
                    if parts.len() >= 2 {
                        json!({ "entry_id": parts[0], "user_id": parts[1] })
                    } else {
                        json!({ "entry_id": s })
                    }
                }),
            },
        );

        // Duplicate entry fingerprints
        let duplicates = self.store.duplicate_fingerprints()?;
        checks.insert(
            "duplicate_fingerprints".to_string(),
            CheckResult {
                status: if duplicates.is_empty() { "pass" } else { "warning" }.to_string(),
                message: if duplicates.is_empty() {
                    "No duplicate entry fingerprints found".to_string()
                } else {
                    format!(
                        "{} set(s) of potential duplicate ledger entries found",
                        duplicates.len()
                    )
                },
                details: details_from(&duplicates, |fp| json!({ "fingerprint": fp })),
            },
        );

        // Records owned by non-student users
        let nonstudents = self.store.nonstudent_records()?;
        checks.insert(
            "nonstudent_records".to_string(),
            CheckResult {
                status: if nonstudents.is_empty() { "pass" } else { "error" }.to_string(),
                message: if nonstudents.is_empty() {
                    "All student records belong to STUDENT users".to_string()
                } else {
                    format!(
                        "{} record(s) belong to users without the STUDENT role",
                        nonstudents.len()
                    )
                },
                details: details_from(&nonstudents, |id| json!({ "user_id": id })),
            },
        );

        let passed = checks.values().filter(|c| c.status == "pass").count() as i64;
        let warnings = checks.values().filter(|c| c.status == "warning").count() as i64;
        let errors = checks.values().filter(|c| c.status == "error").count() as i64;

        Ok(DoctorResult {
            checks,
            summary: DoctorSummary {
                passed,
                warnings,
                errors,
            },
        })
    }
}

fn details_from<F>(items: &[String], to_json: F) -> Option<Vec<serde_json::Value>>
where
    F: Fn(&str) -> serde_json::Value,
{
    if items.is_empty() {
        None
    } else {
        Some(items.iter().map(|s| to_json(s)).collect())
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorResult {
    pub checks: HashMap<String, CheckResult>,
    pub summary: DoctorSummary,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
pub struct DoctorSummary {
    pub passed: i64,
    pub warnings: i64,
    pub errors: i64,
}
