use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DIGITS: Regex = Regex::new(r"[0-9]+").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref NOT_SLUG: Regex = Regex::new(r"[^a-z0-9\-_]").unwrap();
    static ref DASHES: Regex = Regex::new(r"-+").unwrap();
}

/// Increment a decimal digit string by one without going through an integer
/// type, so long runs never overflow. Leading zeros are dropped first.
fn increment_digits(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    let mut out: Vec<u8> = trimmed.bytes().collect();
    let mut i = out.len();
    loop {
        if i == 0 {
            out.insert(0, b'1');
            break;
        }
        i -= 1;
        if out[i] == b'9' {
            out[i] = b'0';
        } else {
            out[i] += 1;
            break;
        }
    }
    String::from_utf8(out).unwrap_or_default()
}

/// Suggest the label following `label` by bumping its last run of digits.
///
/// `"Week 24"` becomes `"Week 25"`, `"Q4 2023"` becomes `"Q4 2024"`. A label
/// without digits gets `" (next)"` appended; an empty label stays empty.
pub fn suggest_next_week_label(label: &str) -> String {
    if label.is_empty() {
        return String::new();
    }
    let Some(last) = DIGITS.find_iter(label).last() else {
        return format!("{label} (next)");
    };
    format!(
        "{}{}{}",
        &label[..last.start()],
        increment_digits(last.as_str()),
        &label[last.end()..]
    )
}

/// Lowercase, dash-separated file name fragment; `"updated"` when nothing
/// usable is left.
pub fn sanitize_file_fragment(value: &str) -> String {
    let lower = value.to_lowercase();
    let dashed = WHITESPACE.replace_all(&lower, "-");
    let cleaned = NOT_SLUG.replace_all(&dashed, "");
    let collapsed = DASHES.replace_all(&cleaned, "-");
    let slug = collapsed.trim_matches('-');
    if slug.is_empty() {
        "updated".to_string()
    } else {
        slug.to_string()
    }
}
