//! Status service - store-wide summaries

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::ports::BillingStore;

/// Status service for store summaries
pub struct StatusService {
    store: Arc<dyn BillingStore>,
}

impl StatusService {
    pub fn new(store: Arc<dyn BillingStore>) -> Self {
        Self { store }
    }

    /// Get overall status summary
    pub fn get_status(&self) -> Result<StatusSummary> {
        let total_users = self.store.user_count()?;
        let total_students = self.store.record_count()?;
        let total_entries = self.store.entry_count()?;
        let outstanding = self.store.outstanding_balance()?;
        let by_college = self.store.students_by_college()?;

        Ok(StatusSummary {
            total_users,
            total_students,
            total_entries,
            outstanding_balance: outstanding.to_string(),
            colleges: by_college
                .into_iter()
                .map(|(college, students)| CollegeSummary {
                    college: college.to_string(),
                    students,
                })
                .collect(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_users: i64,
    pub total_students: i64,
    pub total_entries: i64,
    pub outstanding_balance: String,
    pub colleges: Vec<CollegeSummary>,
}

#[derive(Debug, Serialize)]
pub struct CollegeSummary {
    pub college: String,
    pub students: i64,
}
