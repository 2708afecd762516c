//! Students command - list the student ids visible to an admin

use anyhow::Result;

use super::{get_context, login_as};
use crate::output;

pub fn run(as_user: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = login_as(&ctx, as_user)?;

    let ids = ctx.access_service.visible_student_ids(&session)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ids)?);
        return Ok(());
    }

    if ids.is_empty() {
        println!("No students visible to {}", as_user);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Student ID"]);
    for id in &ids {
        table.add_row(vec![id]);
    }
    println!("{}", table);
    println!("{} student(s) visible to {}", ids.len(), as_user);

    Ok(())
}
