//! Record service - gated read and edit of student records
//!
//! Every operation resolves the requester from the session and runs the
//! access decision before touching a record. Edits come in two flavors:
//! permanent (persisted) and temporary (session overlay, visible only to
//! later reads in the same session and dropped on logout).

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{StudentProfile, StudentRecord};
use crate::ports::BillingStore;

use super::access::can_access;
use super::session::{current_user_of, Session};

/// Gated student-record operations
pub struct RecordService {
    store: Arc<dyn BillingStore>,
}

impl RecordService {
    pub fn new(store: Arc<dyn BillingStore>) -> Self {
        Self { store }
    }

    /// Resolve the target profile and enforce the access decision
    fn authorize(&self, session: &Session, user_id: &str) -> Result<StudentProfile> {
        let requester = current_user_of(self.store.as_ref(), session)?;
        let profile = self
            .store
            .profile_by_user(user_id)?
            .ok_or_else(|| Error::RecordNotFound(user_id.to_string()))?;

        if !can_access(Some(&requester), &profile) {
            return Err(Error::permission_denied(format!(
                "user {} may not access the record of {}",
                requester.id, user_id
            )));
        }
        Ok(profile)
    }

    /// Read a student record
    ///
    /// A temporary edit stashed in this session takes precedence over the
    /// stored record.
    pub fn get_record(&self, session: &Session, user_id: &str) -> Result<StudentRecord> {
        self.authorize(session, user_id)?;

        if let Some(overlay) = session.overlay(user_id) {
            return Ok(overlay.clone());
        }

        self.store
            .record_by_user(user_id)?
            .ok_or_else(|| Error::RecordNotFound(user_id.to_string()))
    }

    /// Overwrite a student record
    ///
    /// `permanent` persists through the store; otherwise the edit lives in
    /// the session only.
    pub fn edit_record(
        &self,
        session: &mut Session,
        user_id: &str,
        record: StudentRecord,
        permanent: bool,
    ) -> Result<()> {
        self.authorize(session, user_id)?;

        if record.user_id != user_id {
            return Err(Error::invalid_input(format!(
                "record user id '{}' does not match target '{}'",
                record.user_id, user_id
            )));
        }
        record
            .validate()
            .map_err(Error::invalid_input)?;

        if permanent {
            self.store.upsert_record(&record)?;
        } else {
            session.set_overlay(record);
        }
        Ok(())
    }
}
