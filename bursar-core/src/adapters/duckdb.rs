//! DuckDB store implementation

use std::path::Path;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use duckdb::{params, params_from_iter, Connection};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{
    ClassStatus, College, EntryKind, LedgerEntry, Role, StudentProfile, StudentRecord, User,
};
use crate::ports::BillingStore;
use crate::services::MigrationService;

/// Maximum number of retries when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// DuckDB store implementation
pub struct DuckDbStore {
    conn: Mutex<Connection>,
}

impl DuckDbStore {
    /// Open (or create) the billing database
    ///
    /// Includes retry logic with exponential backoff for file locking
    /// errors, which can occur when a load and a status query race during
    /// startup.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[bursar] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::storage(format!("Failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    /// Attempt to open a database connection (called by new() with retry logic)
    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Disable extension autoloading to avoid macOS code signing issues
        // (cached extensions in ~/.duckdb/extensions may have different Team IDs)
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_with_flags(db_path, config)?;
        Ok(conn)
    }

    /// Run database migrations using the MigrationService
    pub fn run_migrations(&self) -> Result<crate::services::MigrationResult> {
        let conn = self.conn.lock().unwrap();
        let migration_service = MigrationService::new(&conn);
        migration_service
            .run_pending()
            .map_err(|e| Error::storage(e.to_string()))
    }

    // === Row mappers ===

    fn row_to_user(&self, row: &duckdb::Row) -> User {
        // Column indices from SELECT: 0: user_id, 1: role, 2: college
        let role_str: String = row.get(1).unwrap_or_default();
        let college_str: String = row.get(2).unwrap_or_default();

        User {
            id: row.get(0).unwrap_or_default(),
            role: role_str.parse().unwrap_or(Role::Student),
            college: college_str.parse().unwrap_or(College::ArtsAndSciences),
        }
    }

    fn row_to_profile(&self, row: &duckdb::Row) -> StudentProfile {
        // Column indices from SELECT: 0: user_id, 1: role, 2: college, 3: class_status
        let status_str: String = row.get(3).unwrap_or_default();

        StudentProfile {
            user: self.row_to_user(row),
            class_status: status_str.parse().unwrap_or(ClassStatus::Freshman),
        }
    }

    fn row_to_record(&self, row: &duckdb::Row) -> StudentRecord {
        // Column indices from SELECT:
        // 0: user_id, 1: class_status, 2: resident, 3: enrolled_since
        let status_str: String = row.get(1).unwrap_or_default();
        let enrolled_str: Option<String> = row.get(3).ok();

        StudentRecord {
            user_id: row.get(0).unwrap_or_default(),
            class_status: status_str.parse().unwrap_or(ClassStatus::Freshman),
            resident: row.get(2).unwrap_or(false),
            enrolled_since: enrolled_str.and_then(|s| parse_date_opt(&s)),
        }
    }

    fn row_to_entry(&self, row: &duckdb::Row) -> LedgerEntry {
        // Column indices from SELECT:
        // 0: entry_id, 1: user_id, 2: kind, 3: amount, 4: note, 5: entry_date,
        // 6: fingerprint, 7: recorded_at
        let id_str: String = row.get(0).unwrap_or_default();
        let kind_str: String = row.get(2).unwrap_or_default();
        let amount: f64 = row.get(3).unwrap_or(0.0);
        let date_str: String = row.get(5).unwrap_or_default();
        let recorded_str: String = row.get(7).unwrap_or_default();

        LedgerEntry {
            id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
            user_id: row.get(1).unwrap_or_default(),
            kind: kind_str.parse().unwrap_or(EntryKind::Charge),
            amount: Decimal::try_from(amount).unwrap_or_default().round_dp(2),
            note: row.get(4).ok(),
            entry_date: parse_date(&date_str),
            fingerprint: row.get(6).ok(),
            recorded_at: parse_timestamp(&recorded_str),
        }
    }

    // === Statement helpers (shared by single and batch writes) ===

    fn upsert_user_stmt(conn: &Connection, user: &User) -> duckdb::Result<()> {
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO sys_users (user_id, role, college, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (user_id) DO UPDATE SET
                role = EXCLUDED.role,
                college = EXCLUDED.college,
                updated_at = EXCLUDED.updated_at",
            params![user.id, user.role.as_str(), user.college.as_str(), now, now],
        )?;
        Ok(())
    }

    fn upsert_record_stmt(conn: &Connection, record: &StudentRecord) -> duckdb::Result<()> {
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO sys_student_records (user_id, class_status, resident, enrolled_since,
                                              created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT (user_id) DO UPDATE SET
                class_status = EXCLUDED.class_status,
                resident = EXCLUDED.resident,
                enrolled_since = EXCLUDED.enrolled_since,
                updated_at = EXCLUDED.updated_at",
            params![
                record.user_id,
                record.class_status.as_str(),
                record.resident,
                record.enrolled_since.map(|d| d.format("%Y-%m-%d").to_string()),
                now,
                now,
            ],
        )?;
        Ok(())
    }

    fn insert_entry_stmt(conn: &Connection, entry: &LedgerEntry) -> duckdb::Result<()> {
        conn.execute(
            "INSERT INTO sys_ledger (entry_id, user_id, kind, amount, note, entry_date,
                                     fingerprint, recorded_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                entry.id.to_string(),
                entry.user_id,
                entry.kind.as_str(),
                entry.amount.to_string().parse::<f64>().unwrap_or(0.0),
                entry.note,
                entry.entry_date.format("%Y-%m-%d").to_string(),
                entry.fingerprint,
                entry.recorded_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

impl BillingStore for DuckDbStore {
    fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    // === Users ===

    fn find_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT user_id, role, college FROM sys_users WHERE user_id = ?")?;

        let user = stmt.query_row([id], |row| Ok(self.row_to_user(row))).ok();

        Ok(user)
    }

    fn save_user(&self, user: &User) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        Self::upsert_user_stmt(&conn, user)?;
        Ok(())
    }

    fn save_users(&self, users: &[User]) -> Result<()> {
        // Single transaction: a concurrent reader sees either none or all of
        // the batch. The connection mutex additionally serializes writers.
        let conn = self.conn.lock().unwrap();
        conn.execute_batch("BEGIN TRANSACTION")?;
        for user in users {
            if let Err(e) = Self::upsert_user_stmt(&conn, user) {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(e.into());
            }
        }
        conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn user_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sys_users", [], |row| row.get(0))?;
        Ok(count)
    }

    // === Student directory ===

    fn profiles_by_college(&self, college: College) -> Result<Vec<StudentProfile>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT u.user_id, u.role, u.college, r.class_status
             FROM sys_student_records r
             JOIN sys_users u ON u.user_id = r.user_id
             WHERE u.college = ?
             ORDER BY u.user_id",
        )?;

        let profiles = stmt
            .query_map([college.as_str()], |row| Ok(self.row_to_profile(row)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(profiles)
    }

    fn profiles_by_class_status(&self, statuses: &[ClassStatus]) -> Result<Vec<StudentProfile>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.conn.lock().unwrap();
        let placeholders = vec!["?"; statuses.len()].join(", ");
        let mut stmt = conn.prepare(&format!(
            "SELECT u.user_id, u.role, u.college, r.class_status
             FROM sys_student_records r
             JOIN sys_users u ON u.user_id = r.user_id
             WHERE r.class_status IN ({})
             ORDER BY u.user_id",
            placeholders
        ))?;

        let profiles = stmt
            .query_map(params_from_iter(statuses.iter().map(|s| s.as_str())), |row| {
                Ok(self.row_to_profile(row))
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(profiles)
    }

    fn profile_by_user(&self, id: &str) -> Result<Option<StudentProfile>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT u.user_id, u.role, u.college, r.class_status
             FROM sys_student_records r
             JOIN sys_users u ON u.user_id = r.user_id
             WHERE u.user_id = ?",
        )?;

        let profile = stmt.query_row([id], |row| Ok(self.row_to_profile(row))).ok();

        Ok(profile)
    }

    // === Student records ===

    fn record_by_user(&self, id: &str) -> Result<Option<StudentRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT user_id, class_status, resident, enrolled_since::VARCHAR
             FROM sys_student_records WHERE user_id = ?",
        )?;

        let record = stmt.query_row([id], |row| Ok(self.row_to_record(row))).ok();

        Ok(record)
    }

    fn upsert_record(&self, record: &StudentRecord) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        Self::upsert_record_stmt(&conn, record)?;
        Ok(())
    }

    fn save_records(&self, records: &[StudentRecord], entries: &[LedgerEntry]) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch("BEGIN TRANSACTION")?;
        for record in records {
            if let Err(e) = Self::upsert_record_stmt(&conn, record) {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(e.into());
            }
        }
        for entry in entries {
            if let Err(e) = Self::insert_entry_stmt(&conn, entry) {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(e.into());
            }
        }
        conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn record_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM sys_student_records", [], |row| row.get(0))?;
        Ok(count)
    }

    // === Ledger ===

    fn append_entry(&self, entry: &LedgerEntry) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        Self::insert_entry_stmt(&conn, entry)?;
        Ok(())
    }

    fn entries_by_user(&self, id: &str) -> Result<Vec<LedgerEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT entry_id, user_id, kind, amount, note, entry_date::VARCHAR,
                    fingerprint, recorded_at
             FROM sys_ledger
             WHERE user_id = ?
             ORDER BY entry_date, recorded_at",
        )?;

        let entries = stmt
            .query_map([id], |row| Ok(self.row_to_entry(row)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(entries)
    }

    fn entry_exists_by_fingerprint(&self, fingerprint: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sys_ledger WHERE fingerprint = ?",
            [fingerprint],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn entry_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sys_ledger", [], |row| row.get(0))?;
        Ok(count)
    }

    // === Statistics ===

    fn students_by_college(&self) -> Result<Vec<(College, i64)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT u.college, COUNT(*)
             FROM sys_student_records r
             JOIN sys_users u ON u.user_id = r.user_id
             GROUP BY u.college",
        )?;

        let counts: Vec<(String, i64)> = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .filter_map(|r| r.ok())
            .collect();

        // Zero-fill so the summary always lists every college
        let result = College::all()
            .iter()
            .map(|college| {
                let count = counts
                    .iter()
                    .find(|(name, _)| name == college.as_str())
                    .map(|(_, n)| *n)
                    .unwrap_or(0);
                (*college, count)
            })
            .collect();

        Ok(result)
    }

    fn outstanding_balance(&self) -> Result<Decimal> {
        let conn = self.conn.lock().unwrap();
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(CASE WHEN kind = 'CHARGE' THEN amount ELSE -amount END), 0)
             FROM sys_ledger",
            [],
            |row| row.get(0),
        )?;
        Ok(Decimal::try_from(total).unwrap_or_default().round_dp(2))
    }

    // === Integrity checks ===

    fn orphaned_records(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT r.user_id
             FROM sys_student_records r
             LEFT JOIN sys_users u ON u.user_id = r.user_id
             WHERE u.user_id IS NULL",
        )?;

        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(ids)
    }

    fn orphaned_entries(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT l.entry_id || ':' || l.user_id
             FROM sys_ledger l
             LEFT JOIN sys_student_records r ON r.user_id = l.user_id
             WHERE r.user_id IS NULL",
        )?;

        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(ids)
    }

    fn duplicate_fingerprints(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT fingerprint
             FROM sys_ledger
             WHERE fingerprint IS NOT NULL
             GROUP BY fingerprint
             HAVING COUNT(*) > 1",
        )?;

        let fps = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(fps)
    }

    fn nonstudent_records(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT r.user_id
             FROM sys_student_records r
             JOIN sys_users u ON u.user_id = r.user_id
             WHERE u.role != 'STUDENT'",
        )?;

        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(ids)
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_else(|_| Utc::now().date_naive())
}

fn parse_date_opt(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
