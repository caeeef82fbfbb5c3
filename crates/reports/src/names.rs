//! Person-name canonicalization.
//!
//! Two keys are produced from free-text names:
//!
//! - the **time-punch key** `"last, first"` (lowercase), shared by the
//!   punch clock, the bio roster and the birthdate export;
//! - the **strict name key** `"last|first"` (letters only, parentheticals
//!   stripped), used where sources format names differently, e.g. the
//!   roster versus the HotSchedules staff table.

use serde::Serialize;

/// A name split into its parts together with its time-punch key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonName {
    pub first: String,
    pub last: String,
    pub time_punch_key: String,
}

/// Split `"Last, First"` or `"First ... Last"` into a [`PersonName`].
///
/// The comma form splits at the first comma. Without a comma the first
/// token is the first name and the final token is the last name; anything
/// in between is ignored. Returns `None` for empty input, a single token,
/// or a comma form with an empty side.
pub fn split_time_punch_name(name: &str) -> Option<PersonName> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (first, last) = if let Some((last, first)) = trimmed.split_once(',') {
        (first.trim(), last.trim())
    } else {
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() < 2 {
            return None;
        }
        (fields[0], fields[fields.len() - 1])
    };

    if first.is_empty() || last.is_empty() {
        return None;
    }

    Some(PersonName {
        first: first.to_string(),
        last: last.to_string(),
        time_punch_key: canonical_time_punch_name(first, last),
    })
}

/// `lower(last) + ", " + lower(first)`.
pub fn canonical_time_punch_name(first: &str, last: &str) -> String {
    format!("{}, {}", last.trim().to_lowercase(), first.trim().to_lowercase())
}

/// Time-punch key for a stored or reported name string.
///
/// Falls back to the lowercased text when the value cannot be split, so a
/// single-token punch name still gets a stable (if unmatched) key.
pub fn canonical_time_punch_key_from_value(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match split_time_punch_name(trimmed) {
        Some(name) => name.time_punch_key,
        None => trimmed.to_lowercase(),
    }
}

/// Split a display name as shown in the HotSchedules staff table.
///
/// The comma form wins when present. Otherwise the first token is the first
/// name and all remaining tokens form the last name.
pub fn split_display_name(name: &str) -> Option<(String, String)> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some((last, first)) = trimmed.split_once(',') {
        let (first, last) = (first.trim(), last.trim());
        if first.is_empty() || last.is_empty() {
            return None;
        }
        return Some((first.to_string(), last.to_string()));
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    if fields.len() < 2 {
        return None;
    }
    Some((fields[0].to_string(), fields[1..].join(" ")))
}

/// Strict alphabetic key `"last|first"`, or `None` if either part
/// normalizes to nothing.
pub fn normalize_name_key(first: &str, last: &str) -> Option<String> {
    let first = normalize_first_name(first);
    let last = normalize_last_name(last);
    if first.is_empty() || last.is_empty() {
        return None;
    }
    Some(format!("{}|{}", last, first))
}

/// First word of the letters-only first name, parentheticals removed.
/// `"Robert (Bob) James"` → `"robert"`.
pub fn normalize_first_name(value: &str) -> String {
    let text = normalize_name_text(&strip_parenthetical(value));
    text.split_whitespace().next().unwrap_or("").to_string()
}

pub fn normalize_last_name(value: &str) -> String {
    normalize_name_text(value)
}

/// Lowercase, keep letters, turn every run of non-letters into one space.
pub fn normalize_name_text(value: &str) -> String {
    let lower = value.trim().to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut last_was_space = false;
    for c in lower.chars() {
        if c.is_alphabetic() {
            out.push(c);
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }
    out.trim().to_string()
}

/// Drop text inside parentheses. Unbalanced `)` are ignored.
pub fn strip_parenthetical(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut depth = 0usize;
    for c in value.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Collapse internal whitespace runs to single spaces and trim.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_form() {
        let name = split_time_punch_name("Smith, John").unwrap();
        assert_eq!(name.first, "John");
        assert_eq!(name.last, "Smith");
        assert_eq!(name.time_punch_key, "smith, john");
    }

    #[test]
    fn whitespace_form_uses_last_token() {
        let name = split_time_punch_name("  Mary  Ann   Jones ").unwrap();
        assert_eq!(name.first, "Mary");
        assert_eq!(name.last, "Jones");
        assert_eq!(name.time_punch_key, "jones, mary");
    }

    #[test]
    fn comma_form_keeps_multiword_first() {
        let name = split_time_punch_name("Garcia Lopez,  Ana Maria").unwrap();
        assert_eq!(name.first, "Ana Maria");
        assert_eq!(name.last, "Garcia Lopez");
        assert_eq!(name.time_punch_key, "garcia lopez, ana maria");
    }

    #[test]
    fn rejects_degenerate_names() {
        assert!(split_time_punch_name("").is_none());
        assert!(split_time_punch_name("   ").is_none());
        assert!(split_time_punch_name("Cher").is_none());
        assert!(split_time_punch_name("Smith,").is_none());
        assert!(split_time_punch_name(", John").is_none());
    }

    #[test]
    fn key_from_value_falls_back_to_lowercase() {
        assert_eq!(canonical_time_punch_key_from_value("John Smith"), "smith, john");
        assert_eq!(canonical_time_punch_key_from_value("Cher"), "cher");
        assert_eq!(canonical_time_punch_key_from_value("  "), "");
    }

    #[test]
    fn display_name_keeps_rest_as_last() {
        assert_eq!(
            split_display_name("Juan de la Cruz"),
            Some(("Juan".to_string(), "de la Cruz".to_string()))
        );
        assert_eq!(
            split_display_name("de la Cruz, Juan"),
            Some(("Juan".to_string(), "de la Cruz".to_string()))
        );
        assert_eq!(split_display_name("Prince"), None);
    }

    #[test]
    fn strict_key_strips_noise() {
        assert_eq!(
            normalize_name_key("Robert (Bob) J.", "O'Neil"),
            Some("o neil|robert".to_string())
        );
        assert_eq!(normalize_name_key("  ANA  ", "Smith-Jones"), Some("smith jones|ana".to_string()));
        assert_eq!(normalize_name_key("(Bob)", "Smith"), None);
        assert_eq!(normalize_name_key("Bob", "123"), None);
    }

    #[test]
    fn parenthetical_nesting() {
        assert_eq!(strip_parenthetical("a(b(c)d)e"), "ae");
        assert_eq!(strip_parenthetical("a)b"), "ab");
    }
}
