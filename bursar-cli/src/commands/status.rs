//! Status command - show store status and summary

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Billing Store Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Users", &status.total_users.to_string()]);
    table.add_row(vec!["Student records", &status.total_students.to_string()]);
    table.add_row(vec!["Ledger entries", &status.total_entries.to_string()]);
    table.add_row(vec!["Outstanding balance", &status.outstanding_balance]);
    println!("{}", table);
    println!();

    println!("{}", "Students by College".bold());
    let mut table = output::create_table();
    table.set_header(vec!["College", "Students"]);
    for college in &status.colleges {
        table.add_row(vec![college.college.clone(), college.students.to_string()]);
    }
    println!("{}", table);

    if ctx.config.demo_mode {
        println!();
        output::warning("Demo mode is enabled - this is sample data");
    }

    Ok(())
}
