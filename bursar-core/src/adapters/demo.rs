//! Demo data source for testing and onboarding
//!
//! Produces a small deterministic campus: admins for two colleges plus the
//! graduate school, and students spread across colleges and class statuses
//! with a term's worth of charges and payments. The data flows through the
//! normal bulk-load path, so demo mode exercises the same validation and
//! duplicate checks as a real load.

use crate::domain::result::Result;
use crate::ports::{RawLedgerEntry, RawStudentRecord, RawUser, RecordSource, UserSource};

/// Deterministic sample campus
pub struct DemoSource;

impl UserSource for DemoSource {
    fn name(&self) -> &str {
        "demo"
    }

    fn read_users(&self) -> Result<Vec<RawUser>> {
        Ok(vec![
            raw_user("admin-eng", "ADMIN", "ENGINEERING"),
            raw_user("admin-bus", "ADMIN", "BUSINESS"),
            raw_user("admin-grad", "ADMIN", "GRADUATE_SCHOOL"),
            raw_user("s-ada", "STUDENT", "ENGINEERING"),
            raw_user("s-boole", "STUDENT", "ENGINEERING"),
            raw_user("s-keynes", "STUDENT", "BUSINESS"),
            raw_user("s-curie", "STUDENT", "ARTS_AND_SCIENCES"),
            raw_user("s-dewey", "STUDENT", "EDUCATION"),
        ])
    }
}

impl RecordSource for DemoSource {
    fn name(&self) -> &str {
        "demo"
    }

    fn read_records(&self) -> Result<Vec<RawStudentRecord>> {
        Ok(vec![
            record(
                "s-ada",
                "MASTERS",
                true,
                vec![
                    entry("CHARGE", "5400.00", "Tuition Spring 2026", "2026-01-10"),
                    entry("CHARGE", "350.00", "Lab fee", "2026-01-12"),
                    entry("PAYMENT", "2000.00", "Online payment", "2026-02-01"),
                ],
            ),
            record(
                "s-boole",
                "SENIOR",
                false,
                vec![
                    entry("CHARGE", "8900.00", "Tuition Spring 2026", "2026-01-10"),
                    entry("PAYMENT", "8900.00", "Scholarship disbursement", "2026-01-20"),
                ],
            ),
            record(
                "s-keynes",
                "JUNIOR",
                true,
                vec![
                    entry("CHARGE", "5400.00", "Tuition Spring 2026", "2026-01-10"),
                    entry("CHARGE", "120.00", "Library fine", "2026-03-03"),
                ],
            ),
            record(
                "s-curie",
                "PHD",
                false,
                vec![
                    entry("CHARGE", "1200.00", "Continuous enrollment", "2026-01-10"),
                    entry("PAYMENT", "1200.00", "Stipend offset", "2026-01-31"),
                ],
            ),
            record(
                "s-dewey",
                "FRESHMAN",
                true,
                vec![entry("CHARGE", "5400.00", "Tuition Spring 2026", "2026-01-10")],
            ),
        ])
    }
}

fn raw_user(id: &str, role: &str, college: &str) -> RawUser {
    RawUser {
        id: id.to_string(),
        role: role.to_string(),
        college: college.to_string(),
    }
}

fn record(id: &str, status: &str, resident: bool, entries: Vec<RawLedgerEntry>) -> RawStudentRecord {
    RawStudentRecord {
        id: id.to_string(),
        class_status: status.to_string(),
        resident,
        enrolled_since: Some("2024-08-20".to_string()),
        entries,
    }
}

fn entry(kind: &str, amount: &str, note: &str, date: &str) -> RawLedgerEntry {
    RawLedgerEntry {
        kind: kind.to_string(),
        amount: amount.to_string(),
        note: Some(note.to_string()),
        date: date.to_string(),
    }
}
