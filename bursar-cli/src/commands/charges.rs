//! Charges command - view charges and payments within a date range

use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use super::bill::print_bill;
use super::{get_context, login_as};

pub fn run(user_id: &str, from: &str, to: &str, as_user: &str, json: bool) -> Result<()> {
    let start = parse_date(from)?;
    let end = parse_date(to)?;

    let ctx = get_context()?;
    let session = login_as(&ctx, as_user)?;

    let bill = ctx
        .billing_service
        .view_charges(&session, user_id, start, end)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bill)?);
        return Ok(());
    }

    println!("Statement {} to {}", start, end);
    print_bill(&bill);
    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow!("'{}' is not a YYYY-MM-DD date", s))
}
