//! Doctor command - run store integrity checks

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let result = ctx.doctor_service.run_checks()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", "Store Health Checks".bold());
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Check", "Status", "Message"]);

    let mut names: Vec<&String> = result.checks.keys().collect();
    names.sort();
    for name in names {
        let check = &result.checks[name];
        let status = match check.status.as_str() {
            "pass" => check.status.green().to_string(),
            "warning" => check.status.yellow().to_string(),
            _ => check.status.red().to_string(),
        };
        table.add_row(vec![name.clone(), status, check.message.clone()]);
    }
    println!("{}", table);
    println!();

    println!(
        "{} passed, {} warning(s), {} error(s)",
        result.summary.passed, result.summary.warnings, result.summary.errors
    );

    if result.summary.errors > 0 {
        anyhow::bail!("integrity checks failed");
    }
    Ok(())
}
