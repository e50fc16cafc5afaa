use std::path::Path;

use crate::cli::{cell_from_input, open_session, row_at, save};
use crate::error::{Result, SheetError};

pub fn edit(file: &str, row: usize, column: &str, value: &str, output: Option<String>) -> Result<()> {
    let mut session = open_session(file)?;
    let id = row_at(&session, row)?;
    if !session.table().has_column(column) {
        return Err(SheetError::Other(format!("Unknown column '{column}'")));
    }
    session.edit_cell(id, column, cell_from_input(value));
    save(&mut session, Some(Path::new(file)), output)?;
    Ok(())
}

pub fn add_row(file: &str, set: &[String], output: Option<String>) -> Result<()> {
    let mut session = open_session(file)?;

    let mut cells = Vec::with_capacity(set.len());
    for pair in set {
        let (column, value) = pair
            .split_once('=')
            .ok_or_else(|| SheetError::Other(format!("Expected COLUMN=VALUE, got '{pair}'")))?;
        if !session.table().has_column(column) {
            return Err(SheetError::Other(format!("Unknown column '{column}'")));
        }
        cells.push((column.to_string(), cell_from_input(value)));
    }

    let id = session.add_row();
    for (column, value) in cells {
        session.edit_cell(id, &column, value);
    }
    println!("Row {} added", session.table().rows().len());
    save(&mut session, Some(Path::new(file)), output)?;
    Ok(())
}

pub fn duplicate_row(file: &str, row: usize, output: Option<String>) -> Result<()> {
    let mut session = open_session(file)?;
    let id = row_at(&session, row)?;
    session.duplicate_row(id);
    println!("Row {row} copied to row {}", session.table().rows().len());
    save(&mut session, Some(Path::new(file)), output)?;
    Ok(())
}

pub fn delete_row(file: &str, row: usize, output: Option<String>) -> Result<()> {
    let mut session = open_session(file)?;
    let id = row_at(&session, row)?;
    session.delete_row(id);
    save(&mut session, Some(Path::new(file)), output)?;
    Ok(())
}

pub fn add_column(file: &str, name: &str, output: Option<String>) -> Result<()> {
    let mut session = open_session(file)?;
    let added = session.add_column(name);
    if added != name.trim() {
        println!("Named the new column \"{added}\"");
    }
    save(&mut session, Some(Path::new(file)), output)?;
    Ok(())
}

pub fn roll_week(file: &str, label: Option<&str>, output: Option<String>) -> Result<()> {
    let mut session = open_session(file)?;
    if let Some(label) = label {
        session.set_next_week_label(label);
    }
    if !session.apply_week_label() {
        let reason = if session.table().roles().week.is_none() {
            "No week column found"
        } else {
            "No next week label; pass --label"
        };
        return Err(SheetError::Other(reason.to_string()));
    }
    save(&mut session, Some(Path::new(file)), output)?;
    Ok(())
}
