// src/core/sanitize.rs

use std::sync::LazyLock;

use regex::Regex;

static LEADING_ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\s*").expect("valid ordinal regex"));

/// Collapse sequences of whitespace (incl. NBSP) into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// "3 CN Terrassa" → "CN Terrassa". Position numbers leak into team cells.
pub fn strip_leading_ordinal(s: &str) -> String {
    LEADING_ORDINAL.replace(s.trim(), "").trim().to_string()
}

/// Identity key for a team name: collapsed whitespace, lowercase.
pub fn name_key(s: &str) -> String {
    normalize_ws(s).to_lowercase()
}

/// Case-insensitive containment in either direction.
/// "CN Terrassa" ~ "C.N. Terrassa"? no. "CN TERRASSA CADET" ~ "cn terrassa"? yes.
pub fn names_overlap(a: &str, b: &str) -> bool {
    let (a, b) = (name_key(a), name_key(b));
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_ws_handles_nbsp_and_newlines() {
        assert_eq!(normalize_ws(" a \u{a0}\n b  "), "a b");
    }

    #[test]
    fn ordinal_is_stripped_only_at_start() {
        assert_eq!(strip_leading_ordinal("12 CN Sabadell"), "CN Sabadell");
        assert_eq!(strip_leading_ordinal("CN Sabadell 2"), "CN Sabadell 2");
        assert_eq!(strip_leading_ordinal("1CN Mataró"), "CN Mataró");
    }

    #[test]
    fn overlap_is_symmetric_and_case_insensitive() {
        assert!(names_overlap("CN TERRASSA", "cn terrassa cadet"));
        assert!(names_overlap("CN Terrassa Cadet", "CN Terrassa"));
        assert!(!names_overlap("CN Sabadell", "CN Terrassa"));
        assert!(!names_overlap("", "CN Terrassa"));
    }
}
