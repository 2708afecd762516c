//! Load command - bulk ingestion of users and student records

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use indicatif::{ProgressBar, ProgressStyle};

use bursar_core::LogEvent;

use super::{get_context, get_logger, log_event};
use crate::output;

#[derive(Subcommand)]
pub enum LoadCommands {
    /// Load users from a JSON or CSV file
    Users {
        /// Path to the source file
        file: PathBuf,
        /// Validate only, persist nothing
        #[arg(long)]
        preview: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load student records (with ledger entries) from a JSON file
    Records {
        /// Path to the source file
        file: PathBuf,
        /// Validate only, persist nothing
        #[arg(long)]
        preview: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: LoadCommands) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let (kind, file, preview, json) = match &command {
        LoadCommands::Users { file, preview, json } => ("users", file, *preview, *json),
        LoadCommands::Records { file, preview, json } => ("records", file, *preview, *json),
    };

    let spinner = if json {
        None
    } else {
        let s = ProgressBar::new_spinner();
        s.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
        s.set_message(format!("Loading {} from {}", kind, file.display()));
        Some(s)
    };

    let result = match &command {
        LoadCommands::Users { file, preview, .. } => {
            ctx.load_service.load_users(file, *preview)
        }
        LoadCommands::Records { file, preview, .. } => {
            ctx.load_service.load_records(file, *preview)
        }
    };

    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    match result {
        Ok(result) => {
            log_event(
                &logger,
                LogEvent::new(if kind == "users" { "users_loaded" } else { "records_loaded" })
                    .with_command("load"),
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            if preview {
                output::warning("Preview only - nothing was persisted");
            }
            output::success(&format!(
                "Discovered {} {}, loaded {}",
                result.discovered, kind, result.loaded
            ));
            if result.entries_loaded > 0 || result.skipped_entries > 0 {
                println!(
                    "Ledger entries: {} loaded, {} skipped as duplicates",
                    result.entries_loaded, result.skipped_entries
                );
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("load_failed")
                    .with_command("load")
                    .with_error(e.to_string()),
            );
            Err(e.into())
        }
    }
}
