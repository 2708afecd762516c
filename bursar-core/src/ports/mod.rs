//! Port definitions - trait seams for external collaborators
//!
//! The store port owns persistence; the source ports own bulk ingestion.
//! Services depend on these traits, never on a concrete adapter.

pub mod source;
pub mod store;

pub use source::{RawLedgerEntry, RawStudentRecord, RawUser, RecordSource, UserSource};
pub use store::BillingStore;
