//! Record command - read and edit student records

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use bursar_core::StudentRecord;

use super::{get_context, login_as};
use crate::output;

#[derive(Subcommand)]
pub enum RecordCommands {
    /// Show a student record
    Get {
        /// Student user id
        user_id: String,
        /// User id to act as
        #[arg(long = "as", value_name = "USER_ID")]
        as_user: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Overwrite a student record from a JSON file
    Edit {
        /// Student user id
        user_id: String,
        /// Path to a JSON file holding the new record
        #[arg(long)]
        file: PathBuf,
        /// Persist the edit; otherwise it lives only in this invocation's
        /// session and is discarded on exit
        #[arg(long)]
        permanent: bool,
        /// User id to act as
        #[arg(long = "as", value_name = "USER_ID")]
        as_user: String,
    },
}

pub fn run(command: RecordCommands) -> Result<()> {
    match command {
        RecordCommands::Get { user_id, as_user, json } => {
            let ctx = get_context()?;
            let session = login_as(&ctx, &as_user)?;
            let record = ctx.record_service.get_record(&session, &user_id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
                return Ok(());
            }

            let mut table = output::create_table();
            table.add_row(vec!["Student", &record.user_id]);
            table.add_row(vec!["Class status", record.class_status.as_str()]);
            table.add_row(vec![
                "Resident",
                if record.resident { "yes" } else { "no" },
            ]);
            table.add_row(vec![
                "Enrolled since",
                &record
                    .enrolled_since
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]);
            println!("{}", table);
            Ok(())
        }
        RecordCommands::Edit { user_id, file, permanent, as_user } => {
            let ctx = get_context()?;
            let mut session = login_as(&ctx, &as_user)?;

            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let record: StudentRecord = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", file.display()))?;

            ctx.record_service
                .edit_record(&mut session, &user_id, record, permanent)?;

            if permanent {
                output::success(&format!("Record of {} updated", user_id));
            } else {
                // A one-shot CLI session ends right here, taking the
                // temporary edit with it. Still useful as a dry-run of the
                // access check and validation.
                output::warning(&format!(
                    "Temporary edit of {} accepted; it is discarded when this session ends. \
                     Use --permanent to persist.",
                    user_id
                ));
            }
            Ok(())
        }
    }
}
