use std::collections::HashSet;

use serde::Serialize;

use crate::classifier::{self, quantity_column};
use crate::models::{Role, Row};
use crate::table::Table;

fn contains_needle(row: &Row, columns: &[String], needle: &str) -> bool {
    columns
        .iter()
        .any(|c| row.text(c).to_lowercase().contains(needle))
}

/// Rows with any cell containing `query`, case-insensitively. A blank query
/// returns every row.
pub fn search<'a>(table: &'a Table, query: &str) -> Vec<&'a Row> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return table.rows().iter().collect();
    }
    table
        .rows()
        .iter()
        .filter(|r| contains_needle(r, table.columns(), &needle))
        .collect()
}

fn descriptor_columns(table: &Table) -> Vec<String> {
    let roles = table.roles();
    let mut columns: Vec<String> = [roles.item, roles.sku].into_iter().flatten().collect();
    columns.dedup();
    if columns.is_empty() {
        columns.extend(table.columns().first().cloned());
    }
    columns
}

/// Like [`search`] but only looks at the item and SKU columns, or the first
/// column when neither is recognised.
pub fn stocktake_search<'a>(table: &'a Table, query: &str) -> Vec<&'a Row> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return table.rows().iter().collect();
    }
    let columns = descriptor_columns(table);
    table
        .rows()
        .iter()
        .filter(|r| contains_needle(r, &columns, &needle))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetStats {
    pub row_count: usize,
    pub total_quantity: Option<f64>,
    pub quantity_column: Option<String>,
    pub unique_items: Option<usize>,
    pub sku_column: Option<String>,
}

pub fn stats(table: &Table) -> SheetStats {
    let quantity_column = quantity_column(table.columns()).cloned();
    let sku_column = classifier::find_role(table.columns(), Role::Sku).cloned();

    let total_quantity = quantity_column.as_deref().map(|column| {
        table
            .rows()
            .iter()
            .filter_map(|r| r.number(column))
            .sum::<f64>()
    });
    let unique_items = sku_column.as_deref().map(|column| {
        table
            .rows()
            .iter()
            .map(|r| r.text(column).trim().to_string())
            .filter(|v| !v.is_empty())
            .collect::<HashSet<_>>()
            .len()
    });

    SheetStats {
        row_count: table.rows().len(),
        total_quantity,
        quantity_column,
        unique_items,
        sku_column,
    }
}

/// True when there are rows and some column can name them.
pub fn has_inventory_columns(table: &Table) -> bool {
    let roles = table.roles();
    !table.rows().is_empty()
        && (roles.item.is_some() || roles.sku.is_some() || !table.columns().is_empty())
}
