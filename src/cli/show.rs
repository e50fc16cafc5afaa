use std::collections::HashSet;

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};
use serde::Serialize;

use crate::classifier::is_numeric_column;
use crate::cli::open_session;
use crate::error::{Result, SheetError};
use crate::fmt::quantity_or_dash;
use crate::models::{CellValue, Role, Row, RowId};
use crate::view;

#[derive(Serialize)]
struct JsonSheet<'a> {
    columns: &'a [String],
    rows: Vec<Vec<&'a CellValue>>,
}

fn render(columns: &[String], rows: &[(usize, &Row)]) -> Table {
    let mut table = Table::new();
    let mut header = vec![Cell::new("#")];
    header.extend(columns.iter().map(Cell::new));
    table.set_header(header);
    for (position, row) in rows {
        let mut cells = vec![Cell::new(position)];
        for column in columns {
            let cell = Cell::new(row.text(column));
            cells.push(if is_numeric_column(column) {
                cell.set_alignment(CellAlignment::Right)
            } else {
                cell
            });
        }
        table.add_row(cells);
    }
    table
}

pub fn show(file: &str, search: Option<&str>, stocktake: Option<&str>, json: bool) -> Result<()> {
    let session = open_session(file)?;
    let sheet = session.table();

    let mut rows: Vec<&Row> = match search {
        Some(q) => view::search(sheet, q),
        None => sheet.rows().iter().collect(),
    };
    if let Some(q) = stocktake {
        let allowed: HashSet<RowId> = view::stocktake_search(sheet, q).iter().map(|r| r.id).collect();
        rows.retain(|r| allowed.contains(&r.id));
    }

    if json {
        let out = JsonSheet {
            columns: sheet.columns(),
            rows: rows
                .iter()
                .map(|r| sheet.columns().iter().filter_map(|c| r.get(c)).collect())
                .collect(),
        };
        let text = serde_json::to_string_pretty(&out).map_err(|e| SheetError::Other(e.to_string()))?;
        println!("{text}");
        return Ok(());
    }

    let kept: HashSet<RowId> = rows.iter().map(|r| r.id).collect();
    let numbered: Vec<(usize, &Row)> = sheet
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, r)| kept.contains(&r.id))
        .map(|(i, r)| (i + 1, r))
        .collect();
    println!("{}\n{}", session.file_meta().sheet_name.bold(), render(sheet.columns(), &numbered));
    if numbered.len() != sheet.rows().len() {
        println!("{} of {} rows", numbered.len(), sheet.rows().len());
    }
    if !session.next_week_label().is_empty() {
        println!("Next week:  {}", session.next_week_label());
    }
    Ok(())
}

pub fn stats(file: &str) -> Result<()> {
    let session = open_session(file)?;
    let s = view::stats(session.table());

    println!("Sheet:       {}", session.file_meta().sheet_name);
    println!("Rows:        {}", s.row_count);
    match &s.quantity_column {
        Some(column) => println!("Quantity:    {} ({column})", quantity_or_dash(s.total_quantity)),
        None => println!("Quantity:    \u{2014}"),
    }
    match (&s.sku_column, s.unique_items) {
        (Some(column), Some(count)) => println!("Unique SKUs: {count} ({column})"),
        _ => println!("Unique SKUs: \u{2014}"),
    }
    if !view::has_inventory_columns(session.table()) {
        println!();
        println!("No inventory rows found.");
    }
    Ok(())
}

pub fn columns(file: &str) -> Result<()> {
    let session = open_session(file)?;
    let roles = session.table().roles();

    let mut table = Table::new();
    table.set_header(vec!["Column", "Role", "Numeric"]);
    for column in session.table().columns() {
        let assigned: Vec<&str> = roles.roles_of(column).iter().map(Role::label).collect();
        table.add_row(vec![
            Cell::new(column),
            Cell::new(assigned.join(", ")),
            Cell::new(if is_numeric_column(column) { "yes" } else { "" }),
        ]);
    }
    println!("Columns\n{table}");

    let missing: Vec<&str> = Role::ALL
        .iter()
        .filter(|r| roles.get(**r).is_none())
        .map(Role::label)
        .collect();
    if !missing.is_empty() {
        println!("Not found: {}", missing.join(", "));
    }
    Ok(())
}
