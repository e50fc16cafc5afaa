use std::collections::{HashMap, HashSet};

use crate::classifier::{self, RoleMap};
use crate::models::{CellValue, Role, Row, RowId};

/// A row as it crosses the input/output boundary: column name to value.
pub type Record = HashMap<String, CellValue>;

/// Header names made unique in order. Blank names become `Column N` (1-based
/// position); repeats get `" 2"`, `" 3"`, ... appended.
pub fn normalize_columns(candidates: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            let trimmed = candidate.trim();
            let base = if trimmed.is_empty() {
                format!("Column {}", index + 1)
            } else {
                trimmed.to_string()
            };
            let mut name = base.clone();
            let mut counter = 1;
            while seen.contains(&name) {
                counter += 1;
                name = format!("{base} {counter}");
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

/// `name` (or `New Column` when blank) with a numeric suffix until it does
/// not collide with `existing`.
pub fn ensure_unique_column_name(name: &str, existing: &[String]) -> String {
    let trimmed = name.trim();
    let base = if trimmed.is_empty() { "New Column" } else { trimmed };
    let mut candidate = base.to_string();
    let mut suffix = 1;
    while existing.iter().any(|c| c == &candidate) {
        suffix += 1;
        candidate = format!("{base} {suffix}");
    }
    candidate
}

/// The in-memory sheet: ordered unique columns and ordered rows.
///
/// Every row holds exactly one cell per column. Row identifiers come from a
/// counter owned by the table and are never reused within it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
    next_id: u64,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from boundary records. Cells are looked up under the
    /// column name as given and stored under its normalized form; anything
    /// missing is an empty string.
    pub fn load(columns: &[String], records: Vec<Record>) -> Self {
        let normalized = normalize_columns(columns);
        let mut table = Self {
            columns: normalized.clone(),
            rows: Vec::with_capacity(records.len()),
            next_id: 0,
        };
        for record in records {
            let cells = columns
                .iter()
                .zip(&normalized)
                .map(|(raw, name)| (name.clone(), record.get(raw).cloned().unwrap_or_default()))
                .collect();
            table.push_row(cells);
        }
        table
    }

    /// Build a table from a header row and positional body rows.
    pub fn load_matrix(header: &[String], body: Vec<Vec<CellValue>>) -> Self {
        let columns = normalize_columns(header);
        let mut table = Self { columns, rows: Vec::with_capacity(body.len()), next_id: 0 };
        for values in body {
            let mut values = values.into_iter();
            let cells = table
                .columns
                .iter()
                .map(|c| (c.clone(), values.next().unwrap_or_default()))
                .collect();
            table.push_row(cells);
        }
        table
    }

    fn fresh_id(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push_row(&mut self, cells: HashMap<String, CellValue>) -> RowId {
        let id = self.fresh_id();
        self.rows.push(Row { id, cells });
        id
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub(crate) fn row_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| r.id == id)
    }

    /// Identifier of the row at a 0-based position.
    pub fn id_at(&self, index: usize) -> Option<RowId> {
        self.rows.get(index).map(|r| r.id)
    }

    pub fn roles(&self) -> RoleMap {
        classifier::classify(&self.columns)
    }

    /// Append a row. Movement columns start at 0, the week column at
    /// `next_week` when one is given, everything else empty.
    pub fn add_row(&mut self, next_week: Option<&str>) -> RowId {
        let week = classifier::find_role(&self.columns, Role::Week).cloned();
        let next_week = next_week.filter(|w| !w.is_empty());
        let cells = self
            .columns
            .iter()
            .map(|column| {
                let value = match next_week {
                    Some(label) if week.as_ref() == Some(column) => CellValue::from(label),
                    _ if classifier::matches_role(Role::Used, column)
                        || classifier::matches_role(Role::Received, column) =>
                    {
                        CellValue::Number(0.0)
                    }
                    _ => CellValue::empty(),
                };
                (column.clone(), value)
            })
            .collect();
        self.push_row(cells)
    }

    /// Append a verbatim copy of row `id` under a new identifier.
    pub fn duplicate_row(&mut self, id: RowId) -> Option<RowId> {
        let cells = self.row(id)?.cells.clone();
        Some(self.push_row(cells))
    }

    pub fn delete_row(&mut self, id: RowId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.id != id);
        self.rows.len() != before
    }

    /// Store `value` as given; numeric coercion happens where values are used.
    pub fn edit_cell(&mut self, id: RowId, column: &str, value: CellValue) -> bool {
        if !self.has_column(column) {
            return false;
        }
        match self.row_mut(id) {
            Some(row) => {
                row.cells.insert(column.to_string(), value);
                true
            }
            None => false,
        }
    }

    /// Append a uniquely named column, empty on every row. Returns the name
    /// actually used.
    pub fn add_column(&mut self, name: &str) -> String {
        self.append_column(name, CellValue::empty())
    }

    pub(crate) fn append_column(&mut self, name: &str, fill: CellValue) -> String {
        let unique = ensure_unique_column_name(name, &self.columns);
        self.columns.push(unique.clone());
        for row in &mut self.rows {
            row.cells.insert(unique.clone(), fill.clone());
        }
        unique
    }

    /// Set `column` to `value` on every row.
    pub fn relabel_column(&mut self, column: &str, value: &CellValue) {
        if !self.has_column(column) {
            return;
        }
        for row in &mut self.rows {
            row.cells.insert(column.to_string(), value.clone());
        }
    }

    /// Rows as positional value lists in column order.
    pub fn matrix(&self) -> Vec<Vec<CellValue>> {
        self.rows
            .iter()
            .map(|r| {
                self.columns
                    .iter()
                    .map(|c| r.get(c).cloned().unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}
