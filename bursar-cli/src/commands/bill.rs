//! Bill command - generate a student's current bill

use anyhow::Result;

use bursar_core::Bill;

use super::{get_context, login_as};
use crate::output;

pub fn run(user_id: &str, as_user: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = login_as(&ctx, as_user)?;

    let bill = ctx.billing_service.generate_bill(&session, user_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bill)?);
        return Ok(());
    }

    print_bill(&bill);
    Ok(())
}

/// Render a bill as a header plus an entries table (shared with charges)
pub fn print_bill(bill: &Bill) {
    println!(
        "Bill for {} ({}, {})",
        bill.user_id, bill.college, bill.class_status
    );
    println!();

    if bill.entries.is_empty() {
        println!("No ledger entries.");
    } else {
        let mut table = output::create_table();
        table.set_header(vec!["Date", "Kind", "Amount", "Note"]);
        for entry in &bill.entries {
            table.add_row(vec![
                entry.entry_date.to_string(),
                entry.kind.to_string(),
                entry.amount.to_string(),
                entry.note.clone().unwrap_or_default(),
            ]);
        }
        println!("{}", table);
    }

    println!();
    println!("Charges:  {}", bill.total_charges);
    println!("Payments: {}", bill.total_payments);
    println!("Balance:  {}", bill.balance);
}
