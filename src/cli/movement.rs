use std::path::Path;

use crate::cli::{open_session, row_at, row_by_item, save};
use crate::error::{Result, SheetError};
use crate::fmt::quantity;
use crate::models::MovementKind;

pub fn run(
    file: &str,
    row: Option<usize>,
    item: Option<&str>,
    used: Option<&str>,
    received: Option<&str>,
    output: Option<String>,
) -> Result<()> {
    let mut session = open_session(file)?;
    let id = match (row, item) {
        (Some(position), _) => row_at(&session, position)?,
        (None, Some(name)) => row_by_item(&session, name)?,
        (None, None) => return Err(SheetError::Other("Pass --row or --item".to_string())),
    };
    let (kind, raw) = match (used, received) {
        (Some(raw), _) => (MovementKind::Used, raw),
        (None, Some(raw)) => (MovementKind::Received, raw),
        (None, None) => return Err(SheetError::Other("Pass --used or --received".to_string())),
    };

    let outcome = session
        .record_movement(id, kind, raw)
        .ok_or_else(|| SheetError::Other("That row no longer exists".to_string()))?;
    println!("{}", outcome.message);
    for column in &outcome.created {
        println!("Added column \"{column}\"");
    }
    println!("Closing stock: {}", quantity(outcome.closing));

    save(&mut session, Some(Path::new(file)), output)?;
    Ok(())
}
