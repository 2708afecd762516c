//! User domain model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role of a system user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Student => "STUDENT",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ADMIN" => Ok(Role::Admin),
            "STUDENT" => Ok(Role::Student),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// College a user belongs to
///
/// GraduateSchool is special: graduate students are not partitioned by
/// undergraduate college, so a graduate-school admin's scope is class-status
/// based rather than college based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum College {
    ArtsAndSciences,
    Business,
    Education,
    Engineering,
    GraduateSchool,
}

impl College {
    pub fn as_str(&self) -> &'static str {
        match self {
            College::ArtsAndSciences => "ARTS_AND_SCIENCES",
            College::Business => "BUSINESS",
            College::Education => "EDUCATION",
            College::Engineering => "ENGINEERING",
            College::GraduateSchool => "GRADUATE_SCHOOL",
        }
    }

    /// All colleges, in display order
    pub fn all() -> &'static [College] {
        &[
            College::ArtsAndSciences,
            College::Business,
            College::Education,
            College::Engineering,
            College::GraduateSchool,
        ]
    }
}

impl FromStr for College {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ARTS_AND_SCIENCES" => Ok(College::ArtsAndSciences),
            "BUSINESS" => Ok(College::Business),
            "EDUCATION" => Ok(College::Education),
            "ENGINEERING" => Ok(College::Engineering),
            "GRADUATE_SCHOOL" => Ok(College::GraduateSchool),
            other => Err(format!("unknown college '{}'", other)),
        }
    }
}

impl fmt::Display for College {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A system user
///
/// The id is the sole identity token; there is no password. Id uniqueness is
/// enforced by the bulk loader at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub role: Role,
    pub college: College,
}

impl User {
    pub fn new(id: impl Into<String>, role: Role, college: College) -> Self {
        Self {
            id: id.into(),
            role,
            college,
        }
    }

    /// Validate user data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.id.trim().is_empty() {
            return Err("user id cannot be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::Student.as_str(), "STUDENT");
        assert!("PROFESSOR".parse::<Role>().is_err());
    }

    #[test]
    fn test_college_round_trip() {
        for college in College::all() {
            assert_eq!(college.as_str().parse::<College>().unwrap(), *college);
        }
        assert!("LAW".parse::<College>().is_err());
    }

    #[test]
    fn test_user_validation() {
        let mut user = User::new("a1", Role::Admin, College::Engineering);
        assert!(user.validate().is_ok());

        user.id = "   ".to_string();
        assert!(user.validate().is_err());
    }
}
