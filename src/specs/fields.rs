// src/specs/fields.rs
//! Label canonicalization and value coercion.
//!
//! Roster headers come in Catalan or Spanish depending on the page language.
//! Both map onto the same short codes the display layer keys on. Labels the
//! table does not know pass through untouched.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::sanitize::normalize_ws;
use crate::model::FieldValue;

pub const NAME_CODE: &str = "Nombre";

#[rustfmt::skip]
static LABELS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // ca
        ("Nom", NAME_CODE),
        ("Partits jugats", "PJ"),
        ("Total goals", "GT"),
        ("Gols", "G"),
        ("Gols penal", "GP"),
        ("Gols en tanda de penals", "G5P"),
        ("Targetes grogues", "TA"),
        ("Targetes vermelles", "TR"),
        ("Expulsions per 20 segons", "EX"),
        ("Expulsions definitives, amb substitució disciplinària", "ED"),
        ("Expulsions definitives per brutalitat, amb substitució als 4 minuts", "EB"),
        ("Expulsions definitives, amb substitució no disciplinària", "EN"),
        ("Expulsions i penal", "EP"),
        ("Faltes per penal", "P"),
        ("Penals fallats", "PF"),
        ("Altres", "O"),
        ("Temps morts", "TM"),
        ("Joc net", "JL"),
        ("Vinculat", "Vinculado"),
        // es
        ("Nombre", NAME_CODE),
        ("Partidos jugados", "PJ"),
        ("Goles totales", "GT"),
        ("Goles", "G"),
        ("Goles de penalti", "GP"),
        ("Goles en tanda de penaltis", "G5P"),
        ("Tarjetas amarillas", "TA"),
        ("Tarjetas rojas", "TR"),
        ("Expulsiones por 20 segundos", "EX"),
        ("Expulsiones definitivas, con sustitución disciplinaria", "ED"),
        ("Expulsiones definitivas por brutalidad, con sustitución a los 4 minutos", "EB"),
        ("Expulsiones definitivas, con sustitución no disciplinaria", "EN"),
        ("Expulsiones y penalti", "EP"),
        ("Faltas por penalti", "P"),
        ("Penaltis fallados", "PF"),
        ("Otros", "O"),
        ("Tiempos muertos", "TM"),
        ("Juego limpio", "JL"),
        ("Vinculado", "Vinculado"),
        ("MVP", "MVP"),
    ])
});

static ABSENT: [&str; 4] = ["", "-", "—", "N/A"];

static INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+$").expect("valid int regex"));
static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+[.,]\d+$").expect("valid decimal regex"));
static VIEW_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:veure|ver)(?:[\s:.]+|$)").expect("valid marker regex")
});

/// Long label → short code. Unknown labels are returned as given.
pub fn canonical_code(label: &str) -> &str {
    LABELS.get(label.trim()).copied().unwrap_or(label)
}

/// Clean and type a raw cell. Placeholders and blanks are `None`.
pub fn coerce(raw: &str) -> Option<FieldValue> {
    let v = normalize_ws(raw);
    if ABSENT.contains(&v.as_str()) {
        return None;
    }
    if INT.is_match(&v) {
        if let Ok(n) = v.parse::<i64>() {
            return Some(FieldValue::Int(n));
        }
    }
    if DECIMAL.is_match(&v) {
        if let Ok(d) = v.replace(',', ".").parse::<f64>() {
            return Some(FieldValue::Decimal(d));
        }
    }
    Some(FieldValue::Text(v))
}

/// Drop the leading "see"/"view" link marker from a player name.
pub fn clean_name(raw: &str) -> String {
    let v = normalize_ws(raw);
    VIEW_MARKER.replace(&v, "").trim().to_string()
}

/// Normalize one (label, cell) pair. Names always stay text.
pub fn normalize_field(label: &str, raw: &str) -> Option<(String, FieldValue)> {
    let code = canonical_code(label);
    if code == NAME_CODE {
        let name = clean_name(raw);
        return (!ABSENT.contains(&name.as_str())).then(|| (s!(code), FieldValue::Text(name)));
    }
    coerce(raw).map(|v| (s!(code), v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bilingual_labels_share_codes() {
        assert_eq!(canonical_code("Partits jugats"), "PJ");
        assert_eq!(canonical_code("Partidos jugados"), "PJ");
        assert_eq!(canonical_code("Expulsions per 20 segons"), "EX");
        assert_eq!(canonical_code("Nom"), NAME_CODE);
        assert_eq!(canonical_code("Vinculat"), "Vinculado");
    }

    #[test]
    fn unknown_labels_pass_through() {
        assert_eq!(canonical_code("Dorsal"), "Dorsal");
    }

    #[test]
    fn coercion_rules() {
        assert_eq!(coerce("  12 "), Some(FieldValue::Int(12)));
        assert_eq!(coerce("-3"), Some(FieldValue::Int(-3)));
        assert_eq!(coerce("1,5"), Some(FieldValue::Decimal(1.5)));
        assert_eq!(coerce("2.25"), Some(FieldValue::Decimal(2.25)));
        assert_eq!(coerce("Sí \n  claro"), Some(FieldValue::Text(s!("Sí claro"))));
        assert_eq!(coerce("inf"), Some(FieldValue::Text(s!("inf"))));
        for absent in ["", " ", "-", "—", "N/A"] {
            assert_eq!(coerce(absent), None, "{absent:?}");
        }
    }

    #[test]
    fn view_marker_is_stripped_case_insensitively() {
        assert_eq!(clean_name("Veure Pau Soler"), "Pau Soler");
        assert_eq!(clean_name("ver  Joan Garcia"), "Joan Garcia");
        assert_eq!(clean_name("VER: Marc Puig"), "Marc Puig");
        assert_eq!(clean_name("Verónica Pla"), "Verónica Pla");
        assert_eq!(clean_name("Veronica Pla"), "Veronica Pla");
    }

    #[test]
    fn names_are_never_numeric() {
        assert_eq!(normalize_field("Nom", "Ver 23"), Some((s!("Nombre"), FieldValue::Text(s!("23")))));
        assert_eq!(normalize_field("Nombre", "Ver"), None);
        assert_eq!(normalize_field("Goles", "4"), Some((s!("G"), FieldValue::Int(4))));
        assert_eq!(normalize_field("Goles", "-"), None);
    }
}
