use std::path::Path;

use crate::classifier;
use crate::error::{Result, SheetError};
use crate::fmt::quantity;
use crate::models::{CellValue, MovementKind, Role, RowId, Status};
use crate::movement::{self, MovementOutcome};
use crate::settings::Settings;
use crate::table::{normalize_columns, Record, Table};
use crate::template::{build_template_table, template_next_week, TEMPLATE_FILE_NAME, TEMPLATE_SHEET_NAME};
use crate::week::{sanitize_file_fragment, suggest_next_week_label};
use crate::workbook::{self, RawSheet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileMeta {
    /// Source file name without its extension.
    pub file_name: String,
    pub sheet_name: String,
}

/// One editing session: the current table plus everything derived from the
/// file it came from. Every operation replaces `status`.
#[derive(Debug, Clone)]
pub struct Session {
    table: Table,
    status: Status,
    file_meta: FileMeta,
    next_week_label: String,
    pending_edits: bool,
    settings: Settings,
}

/// Blank used/received cells become 0 so the movement inputs start at zero.
fn apply_movement_defaults(table: &mut Table) {
    let targets: Vec<String> = [Role::Used, Role::Received]
        .into_iter()
        .filter_map(|role| classifier::find_role(table.columns(), role).cloned())
        .collect();
    let ids: Vec<RowId> = table.rows().iter().map(|r| r.id).collect();
    for id in ids {
        for column in &targets {
            let blank = matches!(
                table.row(id).and_then(|r| r.get(column)),
                Some(CellValue::Text(s)) if s.is_empty()
            );
            if blank {
                table.edit_cell(id, column, CellValue::Number(0.0));
            }
        }
    }
}

/// Suggested label after the last non-blank week cell, or that cell itself
/// when no suggestion can be made.
fn next_week_after_load(table: &Table) -> String {
    let Some(week) = classifier::find_role(table.columns(), Role::Week) else {
        return String::new();
    };
    let last = table
        .rows()
        .iter()
        .rev()
        .map(|r| r.text(week))
        .find(|v| !v.trim().is_empty());
    match last {
        Some(last) => {
            let suggestion = suggest_next_week_label(&last);
            if suggestion.is_empty() {
                last
            } else {
                suggestion
            }
        }
        None => String::new(),
    }
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            table: Table::new(),
            status: Status::idle(),
            file_meta: FileMeta::default(),
            next_week_label: String::new(),
            pending_edits: false,
            settings,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn file_meta(&self) -> &FileMeta {
        &self.file_meta
    }

    pub fn next_week_label(&self) -> &str {
        &self.next_week_label
    }

    pub fn has_pending_edits(&self) -> bool {
        self.pending_edits
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_next_week_label(&mut self, label: &str) {
        self.next_week_label = label.to_string();
    }

    fn touch(&mut self, status: Status) {
        self.pending_edits = true;
        self.status = status;
    }

    fn install(&mut self, table: Table, meta: FileMeta) {
        self.next_week_label = next_week_after_load(&table);
        self.table = table;
        self.file_meta = meta;
        self.pending_edits = false;
    }

    /// Replace the table with the first sheet of `path`. On failure the
    /// status carries the error and the previous table is kept.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let display = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        self.status = Status::loading(format!("Reading {display}..."));

        let sheet = match workbook::read_sheet(path) {
            Ok(sheet) => sheet,
            Err(e) => {
                match &e {
                    SheetError::Unreadable(detail) => {
                        log::warn!("failed to read {}: {detail}", path.display())
                    }
                    other => log::warn!("rejected {}: {other}", path.display()),
                }
                self.status = Status::error(e.to_string());
                return Err(e);
            }
        };

        let columns = normalize_columns(&sheet.header);
        let records: Vec<Record> = sheet
            .body
            .into_iter()
            .map(|values| columns.iter().cloned().zip(values).collect())
            .collect();
        let meta = FileMeta {
            file_name: workbook::base_name(path),
            sheet_name: sheet.sheet_name,
        };
        self.load_records(&columns, records, meta)?;
        log::info!("loaded {} rows from {}", self.table.rows().len(), path.display());
        Ok(())
    }

    /// Install boundary records as the new table. Blank used/received cells
    /// become 0 and the next-week label is derived from the week column. On
    /// failure the previous table is kept.
    pub fn load_records(&mut self, columns: &[String], records: Vec<Record>, meta: FileMeta) -> Result<()> {
        if columns.is_empty() {
            let e = SheetError::NoColumns;
            self.status = Status::error(e.to_string());
            return Err(e);
        }
        let mut table = Table::load(columns, records);
        apply_movement_defaults(&mut table);
        let rows = table.rows().len();
        let sheet = meta.sheet_name.clone();
        self.install(table, meta);
        self.status = Status::success(format!("Loaded {} rows from \"{sheet}\".", quantity(rows as f64)));
        Ok(())
    }

    /// Discard the current table and start from the template workbook.
    pub fn start_template(&mut self) {
        self.reset();
        let table = build_template_table();
        self.next_week_label = template_next_week(&table);
        self.table = table;
        self.file_meta = FileMeta {
            file_name: TEMPLATE_FILE_NAME.to_string(),
            sheet_name: TEMPLATE_SHEET_NAME.to_string(),
        };
        self.pending_edits = false;
        self.status = Status::success(
            "Created a fresh weekly workbook template. Customize and export when ready.",
        );
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.settings.clone());
    }

    pub fn add_row(&mut self) -> RowId {
        let next = Some(self.next_week_label.as_str()).filter(|l| !l.is_empty());
        let id = self.table.add_row(next);
        log::debug!("added row {id:?}");
        self.touch(Status::success("Added a row."));
        id
    }

    pub fn duplicate_row(&mut self, id: RowId) -> Option<RowId> {
        let copy = self.table.duplicate_row(id)?;
        log::debug!("duplicated row {id:?} as {copy:?}");
        self.touch(Status::success("Duplicated row."));
        Some(copy)
    }

    pub fn delete_row(&mut self, id: RowId) -> bool {
        if !self.table.delete_row(id) {
            return false;
        }
        log::debug!("deleted row {id:?}");
        self.touch(Status::success("Deleted row."));
        true
    }

    pub fn edit_cell(&mut self, id: RowId, column: &str, value: CellValue) -> bool {
        if !self.table.edit_cell(id, column, value) {
            return false;
        }
        self.touch(Status::success(format!("Updated {column}.")));
        true
    }

    pub fn add_column(&mut self, name: &str) -> String {
        let unique = self.table.add_column(name);
        self.touch(Status::success(format!("Added \"{name}\" column.")));
        unique
    }

    /// Write the next-week label into the week column of every row.
    pub fn apply_week_label(&mut self) -> bool {
        let label = self.next_week_label.clone();
        let Some(week) = self.table.roles().week else {
            return false;
        };
        if label.trim().is_empty() {
            return false;
        }
        self.table.relabel_column(&week, &CellValue::from(label.as_str()));
        self.touch(Status::success(format!("Applied \"{label}\" to the {week} column.")));
        true
    }

    pub fn record_movement(&mut self, id: RowId, kind: MovementKind, raw: &str) -> Option<MovementOutcome> {
        let next = Some(self.next_week_label.as_str())
            .filter(|l| self.settings.relabel_week_on_movement && !l.is_empty());
        let outcome = movement::record_movement(&mut self.table, id, kind, raw, next)?;
        self.touch(Status::success(outcome.message.clone()));
        Some(outcome)
    }

    /// Output boundary: header and rows in stored order, identifiers stripped.
    pub fn export_sheet(&self) -> RawSheet {
        let sheet_name = if self.file_meta.sheet_name.is_empty() {
            self.settings.sheet_name.clone()
        } else {
            self.file_meta.sheet_name.clone()
        };
        RawSheet {
            sheet_name,
            header: self.table.columns().to_vec(),
            body: self.table.matrix(),
        }
    }

    /// `{file}-{next week slug}.xlsx`, falling back to `inventory` and
    /// `updated`.
    pub fn download_file_name(&self) -> String {
        let base = if self.file_meta.file_name.is_empty() {
            "inventory"
        } else {
            &self.file_meta.file_name
        };
        let suffix = if self.next_week_label.is_empty() {
            "updated".to_string()
        } else {
            sanitize_file_fragment(&self.next_week_label)
        };
        format!("{base}-{suffix}.xlsx")
    }

    pub fn export_to(&mut self, path: &Path) -> Result<()> {
        if self.table.columns().is_empty() {
            let e = SheetError::Other("Nothing to export yet. Load a file or start a template.".to_string());
            self.status = Status::error(e.to_string());
            return Err(e);
        }
        let sheet = self.export_sheet();
        if let Err(e) = workbook::write_sheet(path, &sheet) {
            self.status = Status::error(e.to_string());
            return Err(e);
        }
        self.pending_edits = false;
        self.status = Status::success(format!("Exported {} rows.", quantity(sheet.body.len() as f64)));
        Ok(())
    }
}
