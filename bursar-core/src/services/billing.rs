//! Billing service - bills, charge statements, and payments
//!
//! Bill math is plain ledger arithmetic: charges add, payments subtract.
//! Every operation is access-gated the same way record reads are.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::result::{Error, Result};
use crate::domain::{Bill, EntryKind, LedgerEntry, StudentProfile};
use crate::ports::BillingStore;

use super::access::can_access;
use super::session::{current_user_of, Session};

/// Gated billing operations
pub struct BillingService {
    store: Arc<dyn BillingStore>,
}

impl BillingService {
    pub fn new(store: Arc<dyn BillingStore>) -> Self {
        Self { store }
    }

    fn authorize(&self, session: &Session, user_id: &str) -> Result<StudentProfile> {
        let requester = current_user_of(self.store.as_ref(), session)?;
        let profile = self
            .store
            .profile_by_user(user_id)?
            .ok_or_else(|| Error::RecordNotFound(user_id.to_string()))?;

        if !can_access(Some(&requester), &profile) {
            return Err(Error::permission_denied(format!(
                "user {} may not access the bill of {}",
                requester.id, user_id
            )));
        }
        Ok(profile)
    }

    /// Generate the current bill: the full ledger plus totals
    pub fn generate_bill(&self, session: &Session, user_id: &str) -> Result<Bill> {
        let profile = self.authorize(session, user_id)?;
        let entries = self.store.entries_by_user(user_id)?;

        Ok(Bill::build(
            user_id,
            profile.user.college,
            profile.class_status,
            entries,
            None,
        ))
    }

    /// Charges and payments within an inclusive date range
    ///
    /// The balance on the returned bill still covers the whole ledger, so a
    /// partial statement shows what is owed today.
    pub fn view_charges(
        &self,
        session: &Session,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Bill> {
        if start > end {
            return Err(Error::invalid_input(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }

        let profile = self.authorize(session, user_id)?;
        let entries = self.store.entries_by_user(user_id)?;

        Ok(Bill::build(
            user_id,
            profile.user.college,
            profile.class_status,
            entries,
            Some((start, end)),
        ))
    }

    /// Apply a payment to a student's ledger
    ///
    /// The payment is dated today, fingerprinted, and appended through the
    /// store; a storage failure is reported, not retried.
    pub fn apply_payment(
        &self,
        session: &Session,
        user_id: &str,
        amount: Decimal,
        note: &str,
    ) -> Result<LedgerEntry> {
        if amount <= Decimal::ZERO {
            return Err(Error::invalid_input("payment amount must be positive"));
        }
        if note.trim().is_empty() {
            return Err(Error::invalid_input("payment note cannot be empty"));
        }

        self.authorize(session, user_id)?;

        let mut entry = LedgerEntry::new(
            user_id,
            EntryKind::Payment,
            amount,
            chrono::Utc::now().date_naive(),
        );
        entry.note = Some(note.trim().to_string());
        entry.ensure_fingerprint();

        self.store.append_entry(&entry)?;
        Ok(entry)
    }
}
