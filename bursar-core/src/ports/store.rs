//! Store port - persistence abstraction

use rust_decimal::Decimal;

use crate::domain::result::Result;
use crate::domain::{ClassStatus, College, LedgerEntry, StudentProfile, StudentRecord, User};

/// Persistence abstraction for users, student records, and the ledger
///
/// This trait defines all store operations. Implementations (adapters)
/// provide the actual database access logic. Batch saves are transactional:
/// a reader never observes a partially committed batch.
pub trait BillingStore: Send + Sync {
    // === Schema ===

    /// Ensure the schema exists (runs pending migrations)
    fn ensure_schema(&self) -> Result<()>;

    // === Users ===

    /// Get user by ID
    fn find_user(&self, id: &str) -> Result<Option<User>>;

    /// Persist a single user (insert or update)
    fn save_user(&self, user: &User) -> Result<()>;

    /// Persist a batch of users in one transaction (all-or-nothing)
    fn save_users(&self, users: &[User]) -> Result<()>;

    fn user_count(&self) -> Result<i64>;

    // === Student directory ===

    /// All student profiles whose owning user belongs to the given college
    fn profiles_by_college(&self, college: College) -> Result<Vec<StudentProfile>>;

    /// All student profiles with any of the given class statuses, system-wide
    fn profiles_by_class_status(&self, statuses: &[ClassStatus]) -> Result<Vec<StudentProfile>>;

    /// The profile owned by the given user, if any
    fn profile_by_user(&self, id: &str) -> Result<Option<StudentProfile>>;

    // === Student records ===

    /// Get the billing record for a user
    fn record_by_user(&self, id: &str) -> Result<Option<StudentRecord>>;

    /// Insert or update a single record
    fn upsert_record(&self, record: &StudentRecord) -> Result<()>;

    /// Persist a batch of records with their ledger entries in one
    /// transaction (all-or-nothing)
    fn save_records(&self, records: &[StudentRecord], entries: &[LedgerEntry]) -> Result<()>;

    fn record_count(&self) -> Result<i64>;

    // === Ledger ===

    /// Append a single entry
    fn append_entry(&self, entry: &LedgerEntry) -> Result<()>;

    /// All entries for a user, oldest first
    fn entries_by_user(&self, id: &str) -> Result<Vec<LedgerEntry>>;

    /// Whether any entry with this fingerprint exists (re-load protection)
    fn entry_exists_by_fingerprint(&self, fingerprint: &str) -> Result<bool>;

    fn entry_count(&self) -> Result<i64>;

    // === Statistics ===

    /// Number of student records per college, in college display order
    fn students_by_college(&self) -> Result<Vec<(College, i64)>>;

    /// Sum of signed ledger amounts across all students
    fn outstanding_balance(&self) -> Result<Decimal>;

    // === Integrity checks ===

    /// Records whose user is missing, as "user_id" strings
    fn orphaned_records(&self) -> Result<Vec<String>>;

    /// Ledger entries whose student record is missing, as
    /// "entry_id:user_id" strings
    fn orphaned_entries(&self) -> Result<Vec<String>>;

    /// Fingerprints appearing on more than one entry
    fn duplicate_fingerprints(&self) -> Result<Vec<String>>;

    /// Records whose owning user does not have the STUDENT role
    fn nonstudent_records(&self) -> Result<Vec<String>>;
}
