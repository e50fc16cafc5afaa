pub mod config;
pub mod edit;
pub mod movement;
pub mod show;
pub mod template;

use std::path::{Path, PathBuf};

use clap::{ArgGroup, Parser, Subcommand};
use colored::Colorize;

use crate::error::{Result, SheetError};
use crate::models::{CellValue, RowId, Status, StatusKind};
use crate::numbers::is_plain_number;
use crate::session::Session;
use crate::settings::{load_settings, shellexpand_path};

#[derive(Parser)]
#[command(name = "stocksheet", about = "Weekly inventory spreadsheet editor.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter weekly inventory workbook.
    Template {
        /// Output path (default: weekly-inventory-week-25.xlsx)
        #[arg(long)]
        output: Option<String>,
    },
    /// Print the sheet as a table.
    Show {
        /// Path to an .xlsx, .xls or .csv file
        file: String,
        /// Only rows with a cell containing this text
        #[arg(long)]
        search: Option<String>,
        /// Only rows whose item or SKU contains this text
        #[arg(long)]
        stocktake: Option<String>,
        /// Print columns and rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show row count, total quantity and unique SKUs.
    Stats {
        file: String,
    },
    /// Show which columns were recognised as week, item, SKU and stock figures.
    Columns {
        file: String,
    },
    /// Log units used or received for one row and recompute its closing stock.
    #[command(group(ArgGroup::new("target").required(true).args(["row", "item"])))]
    #[command(group(ArgGroup::new("movement").required(true).args(["used", "received"])))]
    Log {
        file: String,
        /// Row number as shown by `stocksheet show`
        #[arg(long)]
        row: Option<usize>,
        /// Item name or SKU of the row
        #[arg(long)]
        item: Option<String>,
        /// Units used/sold; an empty value clears the cell
        #[arg(long)]
        used: Option<String>,
        /// Units received; an empty value clears the cell
        #[arg(long)]
        received: Option<String>,
        #[arg(long)]
        output: Option<String>,
    },
    /// Set a single cell.
    Edit {
        file: String,
        #[arg(long)]
        row: usize,
        #[arg(long)]
        column: String,
        #[arg(long)]
        value: String,
        #[arg(long)]
        output: Option<String>,
    },
    /// Append a row, optionally filling some cells.
    AddRow {
        file: String,
        /// Cell to fill, as COLUMN=VALUE (repeatable)
        #[arg(long = "set")]
        set: Vec<String>,
        #[arg(long)]
        output: Option<String>,
    },
    /// Append a copy of a row.
    DuplicateRow {
        file: String,
        #[arg(long)]
        row: usize,
        #[arg(long)]
        output: Option<String>,
    },
    /// Remove a row.
    DeleteRow {
        file: String,
        #[arg(long)]
        row: usize,
        #[arg(long)]
        output: Option<String>,
    },
    /// Append an empty column.
    AddColumn {
        file: String,
        name: String,
        #[arg(long)]
        output: Option<String>,
    },
    /// Write the next week label into every row's week column.
    RollWeek {
        file: String,
        /// Label to apply instead of the suggested one
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        output: Option<String>,
    },
    /// Show or change settings.
    Config {
        /// Sheet name for exports from sources without one
        #[arg(long = "sheet-name")]
        sheet_name: Option<String>,
        /// Directory for exports without --output
        #[arg(long = "export-dir")]
        export_dir: Option<String>,
        /// Overwrite a row's week with the next week when logging movements
        #[arg(long = "relabel-week-on-movement")]
        relabel_week_on_movement: Option<bool>,
    },
}

pub(crate) fn print_status(status: &Status) {
    match status.kind {
        StatusKind::Success => println!("{}", status.message.green()),
        StatusKind::Error => eprintln!("{}", status.message.red()),
        StatusKind::Idle | StatusKind::Loading => println!("{}", status.message),
    }
}

/// New session with `file` loaded.
pub(crate) fn open_session(file: &str) -> Result<Session> {
    let mut session = Session::new(load_settings());
    session.load_file(Path::new(file))?;
    log::debug!("{}", session.status().message);
    Ok(session)
}

/// Identifier of the 1-based row `position`.
pub(crate) fn row_at(session: &Session, position: usize) -> Result<RowId> {
    position
        .checked_sub(1)
        .and_then(|i| session.table().id_at(i))
        .ok_or_else(|| {
            SheetError::Other(format!(
                "No row {position} (the sheet has {} rows)",
                session.table().rows().len()
            ))
        })
}

/// First row whose item or SKU equals `name`, ignoring case.
pub(crate) fn row_by_item(session: &Session, name: &str) -> Result<RowId> {
    let roles = session.table().roles();
    let columns: Vec<&str> = [roles.item.as_deref(), roles.sku.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    let needle = name.trim().to_lowercase();
    session
        .table()
        .rows()
        .iter()
        .find(|r| columns.iter().any(|c| r.text(c).trim().to_lowercase() == needle))
        .map(|r| r.id)
        .ok_or_else(|| SheetError::Other(format!("No row with item or SKU '{name}'")))
}

/// CLI input as a cell: plain numbers become numbers, everything else text.
pub(crate) fn cell_from_input(value: &str) -> CellValue {
    if is_plain_number(value) {
        if let Ok(n) = value.trim().parse::<f64>() {
            return CellValue::Number(n);
        }
    }
    CellValue::from(value)
}

/// Where an export goes without `--output`: the configured export directory,
/// else next to `source`.
pub(crate) fn default_output(session: &Session, source: Option<&Path>) -> PathBuf {
    let dir = match &session.settings().export_dir {
        Some(dir) => PathBuf::from(shellexpand_path(dir)),
        None => source
            .and_then(|p| p.parent())
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    dir.join(session.download_file_name())
}

/// Export the session and report where it went. A sheet loaded from
/// `source` is only written when it has unsaved edits; `None` is returned
/// otherwise.
pub(crate) fn save(session: &mut Session, source: Option<&Path>, output: Option<String>) -> Result<Option<PathBuf>> {
    if source.is_some() && !session.has_pending_edits() {
        println!("No changes to write.");
        return Ok(None);
    }
    let path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output(session, source));
    session.export_to(&path)?;
    print_status(session.status());
    println!("Wrote {}", path.display());
    Ok(Some(path))
}
