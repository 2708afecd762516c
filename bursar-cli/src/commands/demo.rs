//! Demo command - manage demo mode

use anyhow::Result;
use clap::Subcommand;

use bursar_core::LogEvent;

use super::{get_bursar_dir, get_logger, log_event};
use crate::output;

use bursar_core::services::DemoService;

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Enable demo mode and seed the sample campus
    On,
    /// Disable demo mode
    Off {
        /// Also delete the demo database
        #[arg(long)]
        clean: bool,
    },
    /// Show whether demo mode is enabled
    Status,
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let demo = DemoService::new(&get_bursar_dir());
    let logger = get_logger();

    match command.unwrap_or(DemoCommands::Status) {
        DemoCommands::On => {
            demo.enable()?;
            log_event(&logger, LogEvent::new("demo_enabled").with_command("demo"));
            output::success("Demo mode enabled - sample campus loaded");
            println!("Try: bursar students --as admin-grad");
        }
        DemoCommands::Off { clean } => {
            demo.disable(clean)?;
            log_event(&logger, LogEvent::new("demo_disabled").with_command("demo"));
            output::success("Demo mode disabled");
        }
        DemoCommands::Status => {
            if demo.is_enabled()? {
                println!("Demo mode is ON");
            } else {
                println!("Demo mode is OFF");
            }
        }
    }

    Ok(())
}
