//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod ledger;
pub mod result;
mod student;
mod user;

pub use ledger::{Bill, EntryKind, LedgerEntry};
pub use student::{ClassStatus, StudentProfile, StudentRecord};
pub use user::{College, Role, User};
