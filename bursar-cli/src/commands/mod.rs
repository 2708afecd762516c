//! CLI command implementations

pub mod bill;
pub mod charges;
pub mod demo;
pub mod doctor;
pub mod load;
pub mod logs;
pub mod pay;
pub mod record;
pub mod status;
pub mod students;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bursar_core::{BursarContext, EntryPoint, LogEvent, LoggingService, Session};

/// Get the bursar directory from environment or default
pub fn get_bursar_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BURSAR_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".bursar")
    }
}

/// Get or create the bursar context
pub fn get_context() -> Result<BursarContext> {
    let bursar_dir = get_bursar_dir();

    std::fs::create_dir_all(&bursar_dir)
        .with_context(|| format!("Failed to create bursar directory: {:?}", bursar_dir))?;

    BursarContext::new(&bursar_dir).context("Failed to initialize bursar context")
}

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let bursar_dir = get_bursar_dir();
    std::fs::create_dir_all(&bursar_dir).ok()?;
    LoggingService::new(&bursar_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Open a session logged in as the given user
pub fn login_as(ctx: &BursarContext, user_id: &str) -> Result<Session> {
    let mut session = Session::new();
    ctx.session_service.login(&mut session, user_id)?;
    Ok(session)
}
