use crate::classifier;
use crate::models::{CellValue, MovementKind, Role, RowId, DEFAULT_CLOSING_LABEL};
use crate::numbers::{parse_movement, round2};
use crate::table::Table;

#[derive(Debug, Clone, PartialEq)]
pub struct MovementOutcome {
    /// Parsed quantity; `None` when the entry was cleared.
    pub value: Option<f64>,
    pub column: String,
    pub closing: f64,
    /// Columns created to hold the movement or the closing figure.
    pub created: Vec<String>,
    pub message: String,
}

/// Closing stock for one row: `max(opening + received - used, 0)` to two
/// decimals. Absent columns and non-numeric cells count as 0.
pub fn closing_stock(opening: Option<f64>, received: Option<f64>, used: Option<f64>) -> f64 {
    let total = opening.unwrap_or(0.0) + received.unwrap_or(0.0) - used.unwrap_or(0.0);
    round2(total.max(0.0))
}

fn resolve_or_create(
    table: &mut Table,
    role: Role,
    fallback: &str,
    fill: CellValue,
    created: &mut Vec<String>,
) -> String {
    if let Some(existing) = classifier::find_role(table.columns(), role) {
        return existing.clone();
    }
    let name = table.append_column(fallback, fill);
    created.push(name.clone());
    name
}

fn status_message(kind: MovementKind, value: Option<f64>, item: &str) -> String {
    let suffix = if item.is_empty() {
        String::new()
    } else {
        format!(" for {item}")
    };
    match value {
        Some(v) => format!("Logged {v} units {}{suffix}.", kind.label()),
        None => format!("Cleared {} value{suffix}.", kind.label()),
    }
}

/// Record a used/received quantity on row `id` and recompute that row's
/// closing stock.
///
/// Missing movement columns are created (`Units Sold`, `Units Received`) and
/// back-filled with 0; a missing closing column is created as `Closing Stock`
/// and left empty on other rows. When `next_week` is given the row's week
/// cell is overwritten with it. Unknown rows leave the table untouched.
pub fn record_movement(
    table: &mut Table,
    id: RowId,
    kind: MovementKind,
    raw: &str,
    next_week: Option<&str>,
) -> Option<MovementOutcome> {
    let row = table.row(id)?;
    let item = table
        .roles()
        .descriptor()
        .map(str::to_string)
        .or_else(|| table.columns().first().cloned())
        .map(|column| row.text(&column).trim().to_string())
        .unwrap_or_default();

    let value = parse_movement(raw);
    let mut created = Vec::new();
    let target = resolve_or_create(
        table,
        kind.role(),
        kind.default_column(),
        CellValue::Number(0.0),
        &mut created,
    );
    let closing_column = resolve_or_create(
        table,
        Role::Closing,
        DEFAULT_CLOSING_LABEL,
        CellValue::empty(),
        &mut created,
    );
    let roles = table.roles();

    let row = table.row_mut(id)?;
    let cell = value.map(CellValue::Number).unwrap_or_default();
    row.cells.insert(target.clone(), cell);

    if let (Some(week), Some(label)) = (&roles.week, next_week.filter(|l| !l.is_empty())) {
        row.cells.insert(week.clone(), CellValue::from(label));
    }

    let read = |column: &Option<String>| column.as_deref().and_then(|c| row.number(c));
    let closing = closing_stock(read(&roles.opening), read(&roles.received), read(&roles.used));
    row.cells.insert(closing_column, CellValue::Number(closing));

    log::debug!("{} {:?} on row {:?}: closing {closing}", kind.label(), value, id);

    Some(MovementOutcome {
        value,
        column: target,
        closing,
        created,
        message: status_message(kind, value, &item),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Record;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn one_row(columns: &[&str], values: &[(&str, CellValue)]) -> (Table, RowId) {
        let record: Record = values.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        let table = Table::load(&cols(columns), vec![record]);
        let id = table.id_at(0).unwrap();
        (table, id)
    }

    fn stock_table() -> (Table, RowId) {
        one_row(
            &["Week", "Item", "Opening Stock", "Units Received", "Units Sold", "Closing Stock"],
            &[
                ("Week", "Week 3".into()),
                ("Item", "Soap".into()),
                ("Opening Stock", 10.0.into()),
                ("Units Received", 0.0.into()),
                ("Units Sold", 0.0.into()),
            ],
        )
    }

    fn cell(table: &Table, id: RowId, column: &str) -> CellValue {
        table.row(id).unwrap().get(column).cloned().unwrap()
    }

    #[test]
    fn test_closing_stock() {
        assert_eq!(closing_stock(Some(10.0), Some(3.0), Some(5.0)), 8.0);
        assert_eq!(closing_stock(Some(2.0), None, Some(5.0)), 0.0);
        assert_eq!(closing_stock(None, Some(1.234), None), 1.23);
    }

    #[test]
    fn test_used_then_received() {
        let (mut table, id) = stock_table();
        record_movement(&mut table, id, MovementKind::Used, "5", None).unwrap();
        let outcome = record_movement(&mut table, id, MovementKind::Received, "3", None).unwrap();
        assert_eq!(outcome.closing, 8.0);
        assert_eq!(cell(&table, id, "Closing Stock"), CellValue::Number(8.0));
        assert_eq!(cell(&table, id, "Units Sold"), CellValue::Number(5.0));
        assert_eq!(cell(&table, id, "Units Received"), CellValue::Number(3.0));
    }

    #[test]
    fn test_clear_used_recomputes_with_zero() {
        let (mut table, id) = stock_table();
        record_movement(&mut table, id, MovementKind::Used, "4", None).unwrap();
        assert_eq!(cell(&table, id, "Closing Stock"), CellValue::Number(6.0));
        let outcome = record_movement(&mut table, id, MovementKind::Used, "", None).unwrap();
        assert_eq!(outcome.value, None);
        assert_eq!(cell(&table, id, "Units Sold"), CellValue::empty());
        assert_eq!(cell(&table, id, "Closing Stock"), CellValue::Number(10.0));
        assert_eq!(outcome.message, "Cleared used value for Soap.");
    }

    #[test]
    fn test_negative_and_garbage_inputs() {
        let (mut table, id) = stock_table();
        let outcome = record_movement(&mut table, id, MovementKind::Used, "-7", None).unwrap();
        assert_eq!(outcome.value, Some(0.0));
        let outcome = record_movement(&mut table, id, MovementKind::Received, "plenty", None).unwrap();
        assert_eq!(outcome.value, Some(0.0));
        assert_eq!(cell(&table, id, "Closing Stock"), CellValue::Number(10.0));
    }

    #[test]
    fn test_closing_never_negative() {
        let (mut table, id) = stock_table();
        let outcome = record_movement(&mut table, id, MovementKind::Used, "25", None).unwrap();
        assert_eq!(outcome.closing, 0.0);
    }

    #[test]
    fn test_message() {
        let (mut table, id) = stock_table();
        let outcome = record_movement(&mut table, id, MovementKind::Received, "2.5", None).unwrap();
        assert_eq!(outcome.message, "Logged 2.5 units received for Soap.");
    }

    #[test]
    fn test_message_without_item_name() {
        let (mut table, id) = one_row(&["Item", "Opening"], &[("Opening", 4.0.into())]);
        let outcome = record_movement(&mut table, id, MovementKind::Used, "1", None).unwrap();
        assert_eq!(outcome.message, "Logged 1 units used.");
    }

    #[test]
    fn test_message_falls_back_to_first_column() {
        let (mut table, id) = one_row(&["Shelf", "Opening"], &[("Shelf", "B4".into())]);
        let outcome = record_movement(&mut table, id, MovementKind::Used, "1", None).unwrap();
        assert_eq!(outcome.message, "Logged 1 units used for B4.");
    }

    #[test]
    fn test_creates_missing_columns() {
        let mut record_a = Record::new();
        record_a.insert("Product".to_string(), CellValue::from("Tea"));
        record_a.insert("Opening".to_string(), CellValue::Number(12.0));
        let mut record_b = Record::new();
        record_b.insert("Product".to_string(), CellValue::from("Milk"));
        let mut table = Table::load(&cols(&["Product", "Opening"]), vec![record_a, record_b]);
        let id = table.id_at(0).unwrap();
        let other = table.id_at(1).unwrap();

        let outcome = record_movement(&mut table, id, MovementKind::Used, "2", None).unwrap();
        assert_eq!(outcome.created, cols(&["Units Sold", "Closing Stock"]));
        assert_eq!(table.columns(), cols(&["Product", "Opening", "Units Sold", "Closing Stock"]).as_slice());
        assert_eq!(cell(&table, id, "Closing Stock"), CellValue::Number(10.0));
        assert_eq!(cell(&table, other, "Units Sold"), CellValue::Number(0.0));
        assert_eq!(cell(&table, other, "Closing Stock"), CellValue::empty());
    }

    #[test]
    fn test_received_without_used_column() {
        let (mut table, id) = one_row(&["Item", "Opening", "Remaining"], &[("Opening", 5.0.into())]);
        let outcome = record_movement(&mut table, id, MovementKind::Received, "3", None).unwrap();
        assert_eq!(outcome.created, cols(&["Units Received"]));
        assert_eq!(cell(&table, id, "Remaining"), CellValue::Number(8.0));
    }

    #[test]
    fn test_week_overwritten_with_next_label() {
        let (mut table, id) = stock_table();
        record_movement(&mut table, id, MovementKind::Used, "1", Some("Week 4")).unwrap();
        assert_eq!(cell(&table, id, "Week"), CellValue::from("Week 4"));
    }

    #[test]
    fn test_week_untouched_without_label() {
        let (mut table, id) = stock_table();
        record_movement(&mut table, id, MovementKind::Used, "1", Some("")).unwrap();
        assert_eq!(cell(&table, id, "Week"), CellValue::from("Week 3"));
    }

    #[test]
    fn test_only_edited_row_recomputed() {
        let (mut table, id) = stock_table();
        let other = table.duplicate_row(id).unwrap();
        table.edit_cell(other, "Closing Stock", 99.0.into());
        record_movement(&mut table, id, MovementKind::Used, "1", None).unwrap();
        assert_eq!(cell(&table, other, "Closing Stock"), CellValue::Number(99.0));
    }

    #[test]
    fn test_unknown_row_is_noop() {
        let (mut table, _) = one_row(&["Item"], &[("Item", "Soap".into())]);
        let before = table.clone();
        assert!(record_movement(&mut table, RowId(50), MovementKind::Used, "1", None).is_none());
        assert_eq!(table, before);
    }

    #[test]
    fn test_text_cells_coerced_leniently() {
        let (mut table, id) = one_row(
            &["Item", "Opening Stock", "Closing Stock"],
            &[("Opening Stock", "12 boxes".into())],
        );
        let outcome = record_movement(&mut table, id, MovementKind::Used, "2", None).unwrap();
        assert_eq!(outcome.closing, 10.0);
    }
}
