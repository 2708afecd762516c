//! Bursar Core - business logic for the university billing back-end
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (User, StudentRecord, LedgerEntry, etc.)
//! - **ports**: Trait definitions for external dependencies (BillingStore, sources)
//! - **services**: Business logic orchestration (sessions, access control, loads, billing)
//! - **adapters**: Concrete implementations (DuckDB, JSON/CSV sources, demo data)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbStore;
use config::Config;
use ports::BillingStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result as CoreResult};
pub use domain::{
    Bill, ClassStatus, College, EntryKind, LedgerEntry, Role, StudentProfile, StudentRecord, User,
};
pub use services::{EntryPoint, LogEvent, LoggingService, Session};

/// Main context for bursar operations
///
/// This is the primary entry point for all business logic. It holds the
/// store, configuration, and all services. Sessions are NOT part of the
/// context: each caller owns its `Session` value and passes it into the
/// session-dependent operations.
pub struct BursarContext {
    pub config: Config,
    pub store: Arc<dyn BillingStore>,
    pub session_service: SessionService,
    pub access_service: AccessService,
    pub load_service: LoadService,
    pub record_service: RecordService,
    pub billing_service: BillingService,
    pub status_service: StatusService,
    pub doctor_service: DoctorService,
    pub demo_service: DemoService,
}

impl BursarContext {
    /// Create a new bursar context
    pub fn new(bursar_dir: &Path) -> Result<Self> {
        let config = Config::load(bursar_dir)?;

        // Determine which database file to use
        let db_filename = if config.demo_mode {
            "demo.duckdb"
        } else {
            "bursar.duckdb"
        };

        let db_path = bursar_dir.join(db_filename);
        let store: Arc<dyn BillingStore> = Arc::new(DuckDbStore::new(&db_path)?);

        // Initialize schema
        store.ensure_schema()?;

        // Create services
        let session_service = SessionService::new(Arc::clone(&store));
        let access_service = AccessService::new(Arc::clone(&store));
        let load_service = LoadService::new(Arc::clone(&store));
        let record_service = RecordService::new(Arc::clone(&store));
        let billing_service = BillingService::new(Arc::clone(&store));
        let status_service = StatusService::new(Arc::clone(&store));
        let doctor_service = DoctorService::new(Arc::clone(&store));
        let demo_service = DemoService::new(bursar_dir);

        Ok(Self {
            config,
            store,
            session_service,
            access_service,
            load_service,
            record_service,
            billing_service,
            status_service,
            doctor_service,
            demo_service,
        })
    }
}
