//! Money and hour tokens as they appear in raw-text exports.
//!
//! Amounts are carried in minor units (cents). Malformed tokens parse as
//! zero; callers never abort a report because of one bad field.

/// Parse `"$1,635.31"`, `"1635.31"`, `"-$12.00"` into cents. Bad input → 0.
pub fn parse_money(token: &str) -> i64 {
    let cleaned: String = token
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return 0;
    }
    parse_minor_units(&cleaned)
        .or_else(|| cleaned.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| (v * 100.0).round() as i64))
        .unwrap_or(0)
}

/// Exact decimal → cents for inputs with at most two decimal places.
fn parse_minor_units(s: &str) -> Option<i64> {
    let negative = s.starts_with('-');
    let s = s.trim_start_matches('-');
    let (dollars, cents) = match s.split_once('.') {
        Some((d, frac)) => {
            let d: i64 = if d.is_empty() { 0 } else { d.parse().ok()? };
            let c: i64 = match frac.len() {
                0 => 0,
                1 => frac.parse::<i64>().ok()? * 10,
                2 => frac.parse().ok()?,
                _ => return None,
            };
            (d, c)
        }
        None => (s.parse().ok()?, 0),
    };
    let minor = dollars.checked_mul(100)?.checked_add(cents)?;
    Some(if negative { -minor } else { minor })
}

/// Parse an `H:MM` duration into decimal hours. Bad input → 0.
pub fn parse_hours(token: &str) -> f64 {
    let Some((h, m)) = token.trim().split_once(':') else {
        return 0.0;
    };
    if m.contains(':') {
        return 0.0;
    }
    let hours: i64 = h.parse().unwrap_or(0);
    let minutes: i64 = m.parse().unwrap_or(0);
    hours as f64 + minutes as f64 / 60.0
}

/// Cents → dollars for display and ratios.
pub fn to_dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}
