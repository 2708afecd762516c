//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// Every operation surfaces its failure to the immediate caller as one of
/// these variants; there is no silent recovery except logout, which cannot
/// fail. Bulk loads abort the entire batch on the first error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No active session")]
    NoActiveSession,

    #[error("User {0} doesn't exist in the system")]
    UserNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Malformed source: {0}")]
    MalformedSource(String),

    #[error("Invalid user: {0}")]
    InvalidUser(String),

    #[error("User with ID {0} already exists in the system")]
    DuplicateUser(String),

    #[error("No student record for user {0}")]
    RecordNotFound(String),

    #[error("Student record for user {0} already exists in the system")]
    DuplicateRecord(String),

    #[error("Invalid student record: {0}")]
    InvalidRecord(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Create a malformed source error
    pub fn malformed_source(msg: impl Into<String>) -> Self {
        Self::MalformedSource(msg.into())
    }

    /// Create an invalid user error
    pub fn invalid_user(msg: impl Into<String>) -> Self {
        Self::InvalidUser(msg.into())
    }

    /// Create an invalid record error
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

impl From<duckdb::Error> for Error {
    fn from(e: duckdb::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::UserNotFound("u1".to_string());
        assert_eq!(err.to_string(), "User u1 doesn't exist in the system");

        let err = Error::DuplicateUser("u2".to_string());
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
