//! Pay command - apply a payment to a student's ledger

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;

use bursar_core::LogEvent;

use super::{get_context, get_logger, log_event, login_as};
use crate::output;

pub fn run(
    user_id: &str,
    amount: &str,
    note: &str,
    as_user: &str,
    yes: bool,
    json: bool,
) -> Result<()> {
    let amount: Decimal = amount
        .trim()
        .parse()
        .map_err(|_| anyhow!("'{}' is not a valid amount", amount))?;

    // Payments are irreversible from the CLI; confirm on a terminal
    if !yes && !json && atty::is(atty::Stream::Stdin) {
        use dialoguer::Confirm;
        let proceed = Confirm::new()
            .with_prompt(format!("Apply a payment of {} to {}?", amount, user_id))
            .default(false)
            .interact()?;
        if !proceed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let ctx = get_context()?;
    let logger = get_logger();
    let session = login_as(&ctx, as_user)?;

    match ctx
        .billing_service
        .apply_payment(&session, user_id, amount, note)
    {
        Ok(entry) => {
            log_event(
                &logger,
                LogEvent::new("payment_applied")
                    .with_command("pay")
                    .with_user(as_user),
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                output::success(&format!(
                    "Payment of {} applied to {} ({})",
                    entry.amount, entry.user_id, entry.id
                ));
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("payment_failed")
                    .with_command("pay")
                    .with_user(as_user)
                    .with_error(e.to_string()),
            );
            Err(e.into())
        }
    }
}
