//! Demo service - manage demo mode
//!
//! Demo mode provides a sample campus for testing and onboarding without
//! touching real billing data. The demo database is seeded through the
//! normal bulk-load path so it exercises the same validation, duplicate
//! checks, and transactional commit as a production load.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::adapters::demo::DemoSource;
use crate::adapters::duckdb::DuckDbStore;
use crate::config::Config;
use crate::ports::BillingStore;
use crate::services::LoadService;

/// Demo service for managing demo mode
pub struct DemoService {
    bursar_dir: PathBuf,
}

impl DemoService {
    pub fn new(bursar_dir: &Path) -> Self {
        Self {
            bursar_dir: bursar_dir.to_path_buf(),
        }
    }

    /// Check if demo mode is currently enabled
    pub fn is_enabled(&self) -> Result<bool> {
        let config = Config::load(&self.bursar_dir)?;
        Ok(config.demo_mode)
    }

    /// Enable demo mode
    ///
    /// This will:
    /// 1. Delete any existing demo database (fresh start)
    /// 2. Enable demo mode in config
    /// 3. Create the demo database and bulk-load the sample campus
    pub fn enable(&self) -> Result<()> {
        self.remove_demo_db()?;

        let mut config = Config::load(&self.bursar_dir).unwrap_or_default();
        config.enable_demo_mode();
        config.save(&self.bursar_dir)?;

        let demo_db = self.bursar_dir.join("demo.duckdb");
        let store: Arc<dyn BillingStore> = Arc::new(DuckDbStore::new(&demo_db)?);
        store.ensure_schema()?;

        let loader = LoadService::new(Arc::clone(&store));
        loader.load_users_from(&DemoSource, false)?;
        loader.load_records_from(&DemoSource, false)?;

        Ok(())
    }

    /// Disable demo mode
    ///
    /// This will:
    /// 1. Disable demo mode in config
    /// 2. Optionally delete the demo database (if clean = true)
    pub fn disable(&self, clean: bool) -> Result<()> {
        let mut config = Config::load(&self.bursar_dir).unwrap_or_default();
        config.disable_demo_mode();
        config.save(&self.bursar_dir)?;

        if clean {
            self.remove_demo_db()?;
        }

        Ok(())
    }

    fn remove_demo_db(&self) -> Result<()> {
        let demo_db = self.bursar_dir.join("demo.duckdb");
        let demo_wal = self.bursar_dir.join("demo.duckdb.wal");
        if demo_db.exists() {
            std::fs::remove_file(&demo_db)?;
        }
        if demo_wal.exists() {
            std::fs::remove_file(&demo_wal)?;
        }
        Ok(())
    }
}
