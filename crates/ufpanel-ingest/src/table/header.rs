//! Header and cell normalization.

/// Normalizes a header value: trims whitespace and stray BOMs, collapses
/// inner runs of whitespace to one space.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// Normalizes a data cell by trimming whitespace.
pub fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// True if the header is a year label: exactly four ASCII digits.
pub fn is_year_label(header: &str) -> bool {
    header.len() == 4 && header.bytes().all(|b| b.is_ascii_digit())
}

/// True if the header is made of ASCII digits only.
pub fn is_digit_label(header: &str) -> bool {
    let trimmed = header.trim();
    !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit())
}
