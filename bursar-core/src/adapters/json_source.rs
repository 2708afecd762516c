//! JSON file sources for users and student records
//!
//! The expected shape is a top-level array. Users:
//! ```json
//! [{"id": "s1", "role": "STUDENT", "college": "ENGINEERING"}]
//! ```
//! Records nest their ledger entries:
//! ```json
//! [{"id": "s1", "classStatus": "JUNIOR", "resident": true,
//!   "entries": [{"kind": "CHARGE", "amount": "2500.00", "date": "2026-01-15"}]}]
//! ```

use std::path::{Path, PathBuf};

use crate::domain::result::{Error, Result};
use crate::ports::{RawStudentRecord, RawUser, RecordSource, UserSource};

/// Users from a JSON array file
pub struct JsonUserSource {
    path: PathBuf,
}

impl JsonUserSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl UserSource for JsonUserSource {
    fn name(&self) -> &str {
        "json"
    }

    fn read_users(&self) -> Result<Vec<RawUser>> {
        let content = read_source_file(&self.path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::malformed_source(format!("{}: {}", self.path.display(), e)))
    }
}

/// Student records from a JSON array file
pub struct JsonRecordSource {
    path: PathBuf,
}

impl JsonRecordSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl RecordSource for JsonRecordSource {
    fn name(&self) -> &str {
        "json"
    }

    fn read_records(&self) -> Result<Vec<RawStudentRecord>> {
        let content = read_source_file(&self.path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::malformed_source(format!("{}: {}", self.path.display(), e)))
    }
}

fn read_source_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::SourceNotFound(path.display().to_string()));
    }
    std::fs::read_to_string(path).map_err(Error::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source.json");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_read_users() {
        let (_dir, path) = write_temp(
            r#"[{"id": "s1", "role": "STUDENT", "college": "ENGINEERING"},
                {"id": "a1", "role": "ADMIN", "college": "GRADUATE_SCHOOL"}]"#,
        );

        let users = JsonUserSource::new(&path).read_users().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, "s1");
        assert_eq!(users[1].college, "GRADUATE_SCHOOL");
    }

    #[test]
    fn test_missing_file_is_source_not_found() {
        let err = JsonUserSource::new(Path::new("/nonexistent/users.json"))
            .read_users()
            .unwrap_err();
        assert!(matches!(err, Error::SourceNotFound(_)));
    }

    #[test]
    fn test_unparseable_file_is_malformed() {
        let (_dir, path) = write_temp("{not json[");
        let err = JsonUserSource::new(&path).read_users().unwrap_err();
        assert!(matches!(err, Error::MalformedSource(_)));
    }

    #[test]
    fn test_read_records_with_entries() {
        let (_dir, path) = write_temp(
            r#"[{"id": "s1", "classStatus": "MASTERS", "resident": true,
                 "enrolledSince": "2024-08-20",
                 "entries": [{"kind": "CHARGE", "amount": "2500.00",
                              "note": "Tuition", "date": "2026-01-15"}]}]"#,
        );

        let records = JsonRecordSource::new(&path).read_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].class_status, "MASTERS");
        assert_eq!(records[0].entries.len(), 1);
        assert_eq!(records[0].entries[0].amount, "2500.00");
    }
}
