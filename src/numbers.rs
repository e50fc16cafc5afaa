use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FLOAT_PREFIX: Regex =
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").unwrap();
    static ref PLAIN_NUMBER: Regex = Regex::new(r"^-?(?:0|[1-9]\d*)(?:\.\d+)?$").unwrap();
}

/// Parse the leading decimal number of `raw`, ignoring anything after it.
/// `"12.5kg"` reads as 12.5, `"abc"` as `None`.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let m = FLOAT_PREFIX.find(s)?;
    m.as_str().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// True for text that should be stored as a number when read from CSV.
/// Codes with leading zeros (`"007"`) stay text.
pub fn is_plain_number(raw: &str) -> bool {
    PLAIN_NUMBER.is_match(raw.trim())
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Movement input: `None` for an empty entry (clears the cell), otherwise a
/// non-negative number, 0 when unparseable.
pub fn parse_movement(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    Some(parse_float_prefix(raw).unwrap_or(0.0).max(0.0))
}
