//! Text-field parsing shared by the composer and the inline editors.

/// Finite number or nothing; blank and unparseable input both give `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn parse_series(raw: &str) -> Option<u32> {
    parse_number(raw)
        .filter(|n| *n >= 1.0 && n.fract() == 0.0 && *n <= u32::MAX as f64)
        .map(|n| n as u32)
}

pub fn parse_rest(raw: &str) -> Option<f64> {
    parse_number(raw).filter(|n| *n >= 0.0)
}

pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// `60.0` shows as `60`, `62.5` stays `62.5`.
pub fn format_number(value: Option<f64>) -> String {
    match value {
        Some(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", n as i64),
        Some(n) => format!("{}", n),
        None => String::new(),
    }
}
