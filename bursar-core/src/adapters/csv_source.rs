//! CSV file source for users
//!
//! Users are flat, so CSV is a natural second encoding for them. Expected
//! header: `id,role,college`. Student records nest ledger entries and are
//! JSON-only.

use std::path::{Path, PathBuf};

use crate::domain::result::{Error, Result};
use crate::ports::{RawUser, UserSource};

/// Users from a CSV file with an `id,role,college` header
pub struct CsvUserSource {
    path: PathBuf,
}

impl CsvUserSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl UserSource for CsvUserSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn read_users(&self) -> Result<Vec<RawUser>> {
        if !self.path.exists() {
            return Err(Error::SourceNotFound(self.path.display().to_string()));
        }

        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|e| Error::malformed_source(format!("{}: {}", self.path.display(), e)))?;

        let mut users = Vec::new();
        for result in reader.deserialize::<RawUser>() {
            let raw = result
                .map_err(|e| Error::malformed_source(format!("{}: {}", self.path.display(), e)))?;
            users.push(raw);
        }

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_users_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "id,role,college").unwrap();
        writeln!(f, "s1,STUDENT,ENGINEERING").unwrap();
        writeln!(f, "a1,ADMIN,GRADUATE_SCHOOL").unwrap();

        let users = CsvUserSource::new(&path).read_users().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].role, "STUDENT");
        assert_eq!(users[1].id, "a1");
    }

    #[test]
    fn test_missing_column_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "id,role").unwrap();
        writeln!(f, "s1,STUDENT").unwrap();

        let err = CsvUserSource::new(&path).read_users().unwrap_err();
        assert!(matches!(err, Error::MalformedSource(_)));
    }
}
