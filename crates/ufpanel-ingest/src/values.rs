//! Cell value parsing.

/// Token DATASUS uses for "no cases recorded".
pub const NO_DATA_TOKEN: &str = "-";

/// Coerces a count cell to a non-negative whole number.
///
/// `"-"`, empty, unparseable and negative cells count as zero; decimals are
/// truncated toward zero. Applying it to its own output is a no-op.
pub fn coerce_count(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NO_DATA_TOKEN {
        return 0;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value.trunc() as i64,
        _ => 0,
    }
}

/// Parses a measure cell, accepting `.` or `,` as decimal separator.
///
/// Empty or unparseable cells are unknown, not zero.
pub fn parse_measure(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = trimmed
        .parse::<f64>()
        .ok()
        .or_else(|| trimmed.replace(',', ".").parse::<f64>().ok())?;
    parsed.is_finite().then_some(parsed)
}

/// Leading run of ASCII digits as a UF code (`"12 Acre"` -> `12`).
pub fn leading_code(region: &str) -> Option<u32> {
    let trimmed = region.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    if end == 0 {
        return None;
    }
    trimmed[..end].parse().ok()
}

/// Region text without its leading UF code (`"12 Acre"` -> `"Acre"`).
pub fn strip_code(region: &str) -> &str {
    region
        .trim_start()
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim()
}
