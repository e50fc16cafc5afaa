use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::numbers::parse_float_prefix;

/// A single spreadsheet cell. An empty `Text` is "no value".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Lenient numeric reading used by the stock arithmetic: numbers as-is,
    /// text through the float-prefix parser, anything else `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Number(_) => None,
            Self::Text(s) => parse_float_prefix(s),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Synthetic row identity. Never exported or displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: RowId,
    pub cells: HashMap<String, CellValue>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Cell value as text, empty when the column is missing.
    pub fn text(&self, column: &str) -> String {
        self.cells.get(column).map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.cells.get(column).and_then(CellValue::as_number)
    }
}

/// Semantic role a column may be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Week,
    Item,
    Sku,
    Opening,
    Received,
    Used,
    Closing,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Week,
        Role::Item,
        Role::Sku,
        Role::Opening,
        Role::Received,
        Role::Used,
        Role::Closing,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Item => "item",
            Self::Sku => "sku",
            Self::Opening => "opening",
            Self::Received => "received",
            Self::Used => "used",
            Self::Closing => "closing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
    Used,
    Received,
}

impl MovementKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Used => "used",
            Self::Received => "received",
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Used => Role::Used,
            Self::Received => Role::Received,
        }
    }

    /// Header used when the movement column has to be created.
    pub fn default_column(&self) -> &'static str {
        match self {
            Self::Used => DEFAULT_USED_LABEL,
            Self::Received => DEFAULT_RECEIVED_LABEL,
        }
    }
}

pub const DEFAULT_USED_LABEL: &str = "Units Sold";
pub const DEFAULT_RECEIVED_LABEL: &str = "Units Received";
pub const DEFAULT_CLOSING_LABEL: &str = "Closing Stock";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Idle,
    Loading,
    Success,
    Error,
}

/// Status event emitted after every session operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn idle() -> Self {
        Self {
            kind: StatusKind::Idle,
            message: "Drop an .xlsx file or use the uploader to begin.".to_string(),
        }
    }

    pub fn loading(message: impl Into<String>) -> Self {
        Self { kind: StatusKind::Loading, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: StatusKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: StatusKind::Error, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::Number(120.0).to_string(), "120");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::from("Week 24").to_string(), "Week 24");
        assert_eq!(CellValue::empty().to_string(), "");
    }

    #[test]
    fn test_cell_as_number() {
        assert_eq!(CellValue::Number(3.0).as_number(), Some(3.0));
        assert_eq!(CellValue::from("12.5").as_number(), Some(12.5));
        assert_eq!(CellValue::from("7 boxes").as_number(), Some(7.0));
        assert_eq!(CellValue::from("n/a").as_number(), None);
        assert_eq!(CellValue::empty().as_number(), None);
        assert_eq!(CellValue::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn test_cell_json_is_untagged() {
        let json = serde_json::to_string(&vec![CellValue::Number(4.0), CellValue::from("x")]).unwrap();
        assert_eq!(json, r#"[4.0,"x"]"#);
    }

    #[test]
    fn test_blank_detection() {
        assert!(CellValue::empty().is_blank());
        assert!(CellValue::from("   ").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }
}
