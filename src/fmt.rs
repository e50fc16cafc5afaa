/// Format a quantity with thousands separators and at most two decimals,
/// trailing zeros dropped: 1234.5 -> "1,234.5".
pub fn quantity(val: f64) -> String {
    let negative = val < 0.0;
    let fixed = format!("{:.2}", val.abs());
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    let dec_part = dec_part.trim_end_matches('0');
    let body = if dec_part.is_empty() {
        with_commas
    } else {
        format!("{with_commas}.{dec_part}")
    };
    if negative && body != "0" {
        format!("-{body}")
    } else {
        body
    }
}

/// Em dash for values that are not available.
pub fn quantity_or_dash(val: Option<f64>) -> String {
    val.map(quantity).unwrap_or_else(|| "\u{2014}".to_string())
}
