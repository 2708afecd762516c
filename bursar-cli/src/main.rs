//! Bursar CLI - university billing at the terminal
//!
//! A thin caller over bursar-core: every data command logs in as the user
//! given with --as, runs one core operation, and renders the result.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{bill, charges, demo, doctor, load, logs, pay, record, status, students};

/// Bursar - university billing back-end
#[derive(Parser)]
#[command(name = "bursar", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bulk-load users or student records from a file
    Load {
        #[command(subcommand)]
        command: load::LoadCommands,
    },

    /// List the student ids visible to an admin
    Students {
        /// User id to act as
        #[arg(long = "as", value_name = "USER_ID")]
        as_user: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read or edit a student record
    Record {
        #[command(subcommand)]
        command: record::RecordCommands,
    },

    /// Generate a student's current bill
    Bill {
        /// Student user id
        user_id: String,
        /// User id to act as
        #[arg(long = "as", value_name = "USER_ID")]
        as_user: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View charges and payments within a date range
    Charges {
        /// Student user id
        user_id: String,
        /// Range start (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: String,
        /// Range end (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: String,
        /// User id to act as
        #[arg(long = "as", value_name = "USER_ID")]
        as_user: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply a payment to a student's ledger
    Pay {
        /// Student user id
        user_id: String,
        /// Payment amount, e.g. 750.00
        amount: String,
        /// Reason for the payment
        #[arg(long)]
        note: String,
        /// User id to act as
        #[arg(long = "as", value_name = "USER_ID")]
        as_user: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show store status and summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run store integrity checks
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Load { command } => load::run(command),
        Commands::Students { as_user, json } => students::run(&as_user, json),
        Commands::Record { command } => record::run(command),
        Commands::Bill { user_id, as_user, json } => bill::run(&user_id, &as_user, json),
        Commands::Charges { user_id, from, to, as_user, json } => {
            charges::run(&user_id, &from, &to, &as_user, json)
        }
        Commands::Pay { user_id, amount, note, as_user, yes, json } => {
            pay::run(&user_id, &amount, &note, &as_user, yes, json)
        }
        Commands::Status { json } => status::run(json),
        Commands::Doctor { json } => doctor::run(json),
        Commands::Demo { command } => demo::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
