//! Ledger domain model - charges, payments, and derived bills

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::student::ClassStatus;
use super::user::College;

/// Kind of ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    Charge,
    Payment,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Charge => "CHARGE",
            EntryKind::Payment => "PAYMENT",
        }
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "CHARGE" => Ok(EntryKind::Charge),
            "PAYMENT" => Ok(EntryKind::Payment),
            other => Err(format!("unknown entry kind '{}'", other)),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single charge or payment on a student's ledger
///
/// Amounts are always positive; the kind determines the sign in balance
/// arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub user_id: String,
    pub kind: EntryKind,
    pub amount: Decimal,
    pub note: Option<String>,
    pub entry_date: NaiveDate,
    /// Hash for re-load protection
    pub fingerprint: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Create a new entry with required fields
    pub fn new(
        user_id: impl Into<String>,
        kind: EntryKind,
        amount: Decimal,
        entry_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            kind,
            amount,
            note: None,
            entry_date,
            fingerprint: None,
            recorded_at: Utc::now(),
        }
    }

    /// Ensure fingerprint is set
    pub fn ensure_fingerprint(&mut self) {
        if self.fingerprint.is_none() {
            self.fingerprint = Some(self.calculate_fingerprint());
        }
    }

    /// Calculate fingerprint hash for deduplication
    ///
    /// Uses: user_id, entry date, kind, amount, and normalized note. Two
    /// loads of the same source data produce identical fingerprints, so
    /// re-loading a records file never doubles the ledger.
    pub fn calculate_fingerprint(&self) -> String {
        let fingerprint_str = format!(
            "{}|{}|{}|{:.2}|{}",
            self.user_id,
            self.entry_date.format("%Y-%m-%d"),
            self.kind,
            self.amount,
            normalize_note(self.note.as_deref()),
        );

        // SHA256 hash, truncated to 16 hex chars
        let mut hasher = Sha256::new();
        hasher.update(fingerprint_str.as_bytes());
        let result = hasher.finalize();
        result[..8].iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Signed contribution to the outstanding balance
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            EntryKind::Charge => self.amount,
            EntryKind::Payment => -self.amount,
        }
    }
}

/// Normalize a note for fingerprint comparison
///
/// Notes arrive from multiple sources (records files, CLI payments) with
/// inconsistent casing and spacing; only alphanumeric content participates
/// in the hash.
fn normalize_note(note: Option<&str>) -> String {
    let note = note.unwrap_or("").to_lowercase();

    let whitespace_re = Regex::new(r"\s+").unwrap();
    let normalized = whitespace_re.replace_all(&note, "").to_string();

    let special_re = Regex::new(r"[^a-z0-9]").unwrap();
    special_re.replace_all(&normalized, "").to_string()
}

/// A bill: the ledger view for one student, optionally range-filtered
///
/// `entries` and the entry totals honor the requested date range; `balance`
/// is always computed over the full ledger so a partial statement still
/// shows what the student owes today.
#[derive(Debug, Clone, Serialize)]
pub struct Bill {
    pub user_id: String,
    pub college: College,
    pub class_status: ClassStatus,
    pub entries: Vec<LedgerEntry>,
    pub total_charges: Decimal,
    pub total_payments: Decimal,
    pub balance: Decimal,
}

impl Bill {
    /// Build a bill from a student's full ledger
    ///
    /// `range` filters the listed entries (inclusive on both ends); the
    /// balance is computed before filtering.
    pub fn build(
        user_id: impl Into<String>,
        college: College,
        class_status: ClassStatus,
        entries: Vec<LedgerEntry>,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Self {
        let balance: Decimal = entries.iter().map(|e| e.signed_amount()).sum();

        let entries: Vec<LedgerEntry> = match range {
            Some((start, end)) => entries
                .into_iter()
                .filter(|e| e.entry_date >= start && e.entry_date <= end)
                .collect(),
            None => entries,
        };

        let total_charges = entries
            .iter()
            .filter(|e| e.kind == EntryKind::Charge)
            .map(|e| e.amount)
            .sum();
        let total_payments = entries
            .iter()
            .filter(|e| e.kind == EntryKind::Payment)
            .map(|e| e.amount)
            .sum();

        Self {
            user_id: user_id.into(),
            college,
            class_status,
            entries,
            total_charges,
            total_payments,
            balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: EntryKind, amount: i64, day: u32) -> LedgerEntry {
        let mut e = LedgerEntry::new(
            "s1",
            kind,
            Decimal::new(amount, 2),
            NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
        );
        e.ensure_fingerprint();
        e
    }

    #[test]
    fn test_fingerprint_generation() {
        let mut e = entry(EntryKind::Charge, 250_000, 15);
        e.note = Some("Tuition Spring".to_string());

        let fp = e.calculate_fingerprint();
        assert_eq!(fp.len(), 16);
        // Stable across recomputation
        assert_eq!(fp, e.calculate_fingerprint());
    }

    #[test]
    fn test_fingerprint_ignores_note_formatting() {
        let mut a = entry(EntryKind::Charge, 10_000, 3);
        let mut b = entry(EntryKind::Charge, 10_000, 3);
        a.note = Some("Lab Fee".to_string());
        b.note = Some("  lab   fee  ".to_string());
        assert_eq!(a.calculate_fingerprint(), b.calculate_fingerprint());
    }

    #[test]
    fn test_fingerprint_distinguishes_kind() {
        let charge = entry(EntryKind::Charge, 5_000, 7);
        let payment = entry(EntryKind::Payment, 5_000, 7);
        assert_ne!(charge.calculate_fingerprint(), payment.calculate_fingerprint());
    }

    #[test]
    fn test_bill_balance_over_full_ledger() {
        let entries = vec![
            entry(EntryKind::Charge, 100_000, 5),   // $1000.00
            entry(EntryKind::Payment, 40_000, 10),  // $400.00
            entry(EntryKind::Charge, 20_000, 20),   // $200.00
        ];

        // Range excludes the Jan 20 charge, balance still includes it
        let bill = Bill::build(
            "s1",
            College::Engineering,
            ClassStatus::Junior,
            entries,
            Some((
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            )),
        );

        assert_eq!(bill.entries.len(), 2);
        assert_eq!(bill.total_charges, Decimal::new(100_000, 2));
        assert_eq!(bill.total_payments, Decimal::new(40_000, 2));
        assert_eq!(bill.balance, Decimal::new(80_000, 2));
    }
}
