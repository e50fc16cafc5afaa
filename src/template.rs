use crate::models::{CellValue, DEFAULT_CLOSING_LABEL, DEFAULT_RECEIVED_LABEL, DEFAULT_USED_LABEL};
use crate::table::Table;
use crate::week::suggest_next_week_label;

pub const TEMPLATE_FILE_NAME: &str = "weekly-inventory";
pub const TEMPLATE_SHEET_NAME: &str = "Inventory Week";

pub const TEMPLATE_COLUMNS: [&str; 9] = [
    "Week",
    "SKU",
    "Item Name",
    "Category",
    "Opening Stock",
    DEFAULT_RECEIVED_LABEL,
    DEFAULT_USED_LABEL,
    DEFAULT_CLOSING_LABEL,
    "Notes",
];

struct SeedRow {
    week: &'static str,
    sku: &'static str,
    item: &'static str,
    category: &'static str,
    opening: f64,
    received: f64,
    sold: f64,
    closing: f64,
    notes: &'static str,
}

const SEED_ROWS: &[SeedRow] = &[
    SeedRow {
        week: "Week 24",
        sku: "SKU-1001",
        item: "Organic Cold Brew",
        category: "Beverage",
        opening: 120.0,
        received: 60.0,
        sold: 140.0,
        closing: 40.0,
        notes: "Promotional week lift.",
    },
    SeedRow {
        week: "Week 24",
        sku: "SKU-2045",
        item: "Blueberry Muffin",
        category: "Bakery",
        opening: 80.0,
        received: 40.0,
        sold: 95.0,
        closing: 25.0,
        notes: "Reorder threshold approaching.",
    },
    SeedRow {
        week: "Week 24",
        sku: "SKU-3308",
        item: "Granola Parfait",
        category: "Grab & Go",
        opening: 65.0,
        received: 25.0,
        sold: 70.0,
        closing: 20.0,
        notes: "Strong weekend performance.",
    },
];

impl SeedRow {
    fn cells(&self) -> Vec<CellValue> {
        vec![
            self.week.into(),
            self.sku.into(),
            self.item.into(),
            self.category.into(),
            self.opening.into(),
            self.received.into(),
            self.sold.into(),
            self.closing.into(),
            self.notes.into(),
        ]
    }
}

/// Starter workbook: three seed rows for one week plus a blank row for the
/// following week with zeroed movements.
pub fn build_template_table() -> Table {
    let header: Vec<String> = TEMPLATE_COLUMNS.iter().map(|c| c.to_string()).collect();
    let mut body: Vec<Vec<CellValue>> = SEED_ROWS.iter().map(SeedRow::cells).collect();

    let next_week = suggest_next_week_label(SEED_ROWS[0].week);
    let blank = TEMPLATE_COLUMNS
        .iter()
        .map(|&column| match column {
            "Week" => CellValue::from(next_week.as_str()),
            DEFAULT_RECEIVED_LABEL | DEFAULT_USED_LABEL => CellValue::Number(0.0),
            _ => CellValue::empty(),
        })
        .collect();
    body.push(blank);

    Table::load_matrix(&header, body)
}

/// Next-week label a template session starts with.
pub fn template_next_week(table: &Table) -> String {
    let first = table
        .rows()
        .first()
        .map(|r| r.text("Week"))
        .unwrap_or_else(|| "Week 1".to_string());
    let suggestion = suggest_next_week_label(&first);
    if suggestion.is_empty() {
        "Week 1".to_string()
    } else {
        suggestion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_shape() {
        let table = build_template_table();
        assert_eq!(table.columns().len(), 9);
        assert_eq!(table.rows().len(), 4);
        assert_eq!(table.columns()[2], "Item Name");
    }

    #[test]
    fn test_blank_row_is_next_week() {
        let table = build_template_table();
        let first_week = table.rows()[0].text("Week");
        let blank = &table.rows()[3];
        assert_eq!(blank.text("Week"), suggest_next_week_label(&first_week));
        assert_eq!(blank.text("Week"), "Week 25");
        assert_eq!(blank.get("Units Sold"), Some(&CellValue::Number(0.0)));
        assert_eq!(blank.get("Units Received"), Some(&CellValue::Number(0.0)));
        assert_eq!(blank.get("Closing Stock"), Some(&CellValue::empty()));
        assert_eq!(blank.get("SKU"), Some(&CellValue::empty()));
    }

    #[test]
    fn test_seed_values() {
        let table = build_template_table();
        let row = &table.rows()[1];
        assert_eq!(row.text("Item Name"), "Blueberry Muffin");
        assert_eq!(row.number("Opening Stock"), Some(80.0));
        assert_eq!(row.text("Notes"), "Reorder threshold approaching.");
    }

    #[test]
    fn test_content_is_deterministic() {
        assert_eq!(build_template_table().matrix(), build_template_table().matrix());
    }

    #[test]
    fn test_template_next_week() {
        let table = build_template_table();
        assert_eq!(template_next_week(&table), "Week 25");
        assert_eq!(template_next_week(&Table::new()), "Week 2");
    }
}
