//! Student profile and record domain models

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::user::User;

/// Enrollment class status of a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassStatus {
    Freshman,
    Sophomore,
    Junior,
    Senior,
    Masters,
    Phd,
}

impl ClassStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassStatus::Freshman => "FRESHMAN",
            ClassStatus::Sophomore => "SOPHOMORE",
            ClassStatus::Junior => "JUNIOR",
            ClassStatus::Senior => "SENIOR",
            ClassStatus::Masters => "MASTERS",
            ClassStatus::Phd => "PHD",
        }
    }

    /// Masters and PhD students fall under the graduate school's scope
    pub fn is_graduate(&self) -> bool {
        matches!(self, ClassStatus::Masters | ClassStatus::Phd)
    }

    /// The graduate class statuses, in the order queries use them
    pub fn graduate_statuses() -> &'static [ClassStatus] {
        &[ClassStatus::Masters, ClassStatus::Phd]
    }
}

impl FromStr for ClassStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "FRESHMAN" => Ok(ClassStatus::Freshman),
            "SOPHOMORE" => Ok(ClassStatus::Sophomore),
            "JUNIOR" => Ok(ClassStatus::Junior),
            "SENIOR" => Ok(ClassStatus::Senior),
            "MASTERS" => Ok(ClassStatus::Masters),
            "PHD" => Ok(ClassStatus::Phd),
            other => Err(format!("unknown class status '{}'", other)),
        }
    }
}

impl fmt::Display for ClassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A student as seen by the access control engine
///
/// Joins the owning user with the enrollment status. Every profile references
/// exactly one user; users without a record (admins) have no profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub user: User,
    pub class_status: ClassStatus,
}

impl StudentProfile {
    pub fn new(user: User, class_status: ClassStatus) -> Self {
        Self { user, class_status }
    }
}

/// The full billing record for one student
///
/// Ledger entries are stored separately and joined on demand; this is the
/// editable part of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub user_id: String,
    pub class_status: ClassStatus,
    /// In-state residency, affects which tuition schedule applies
    pub resident: bool,
    pub enrolled_since: Option<NaiveDate>,
}

impl StudentRecord {
    pub fn new(user_id: impl Into<String>, class_status: ClassStatus) -> Self {
        Self {
            user_id: user_id.into(),
            class_status,
            resident: false,
            enrolled_since: None,
        }
    }

    /// Validate record data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.user_id.trim().is_empty() {
            return Err("record user id cannot be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{College, Role};

    #[test]
    fn test_graduate_statuses() {
        assert!(ClassStatus::Masters.is_graduate());
        assert!(ClassStatus::Phd.is_graduate());
        assert!(!ClassStatus::Junior.is_graduate());
    }

    #[test]
    fn test_class_status_round_trip() {
        for s in ["FRESHMAN", "SOPHOMORE", "JUNIOR", "SENIOR", "MASTERS", "PHD"] {
            assert_eq!(s.parse::<ClassStatus>().unwrap().as_str(), s);
        }
        assert!("ALUMNUS".parse::<ClassStatus>().is_err());
    }

    #[test]
    fn test_profile_owner() {
        let user = User::new("s1", Role::Student, College::Engineering);
        let profile = StudentProfile::new(user.clone(), ClassStatus::Junior);
        assert_eq!(profile.user.id, "s1");
        assert_eq!(profile.user, user);
    }
}
