// src/jornada.rs
//! Round ("jornada") numbering.
//!
//! The portal lists never print the round. It is inferred from row order,
//! which breaks whenever a match is rescheduled. The correction overlay is a
//! hand-maintained JSON file that pins the real round of specific matches:
//!
//! ```json
//! { "cadet": { "143649168": { "jornada_real": 3, "nota": "Aplazado" } } }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Fixture, Match};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub jornada_real: u32,
    #[serde(default, alias = "nota")]
    pub note: String,
}

/// team key → match id → correction. Loaded once, read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrectionOverlay(HashMap<String, HashMap<String, Correction>>);

impl CorrectionOverlay {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&text)
    }

    pub fn lookup(&self, team_key: &str, match_id: &str) -> Option<&Correction> {
        self.0.get(team_key)?.get(match_id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(HashMap::is_empty)
    }
}

/// An override that actually hit a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCorrection {
    pub match_id: String,
    pub inferred: u32,
    pub jornada_real: u32,
    pub note: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assigned {
    pub matches: Vec<Match>,
    pub corrections: Vec<AppliedCorrection>,
}

/// Number fixtures in list order starting at 1. An overlay hit replaces the
/// stored value for that match only; the counter still advances.
pub fn assign(fixtures: Vec<Fixture>, team_key: &str, overlay: &CorrectionOverlay) -> Assigned {
    let mut corrections = Vec::new();

    let matches = fixtures
        .into_iter()
        .zip(1u32..)
        .map(|(fixture, inferred)| {
            let hit = fixture
                .match_id
                .as_deref()
                .and_then(|id| overlay.lookup(team_key, id).map(|c| (id, c)));

            let jornada = match hit {
                Some((id, c)) => {
                    logf!(team = team_key, match_id = id, "jornada {inferred} -> {}: {}", c.jornada_real, c.note);
                    corrections.push(AppliedCorrection {
                        match_id: s!(id),
                        inferred,
                        jornada_real: c.jornada_real,
                        note: c.note.clone(),
                    });
                    c.jornada_real
                }
                None => inferred,
            };
            Match { jornada, fixture }
        })
        .collect();

    Assigned { matches, corrections }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Team;

    fn fixture(id: Option<&str>) -> Fixture {
        Fixture {
            match_id: id.map(String::from),
            team1: Team::named("CN Terrassa"),
            team2: Team::named("CN Sabadell"),
            ..Fixture::default()
        }
    }

    fn jornadas(a: &Assigned) -> Vec<u32> {
        a.matches.iter().map(|m| m.jornada).collect()
    }

    #[test]
    fn counter_is_dense_without_overlay() {
        let list = vec![fixture(Some("1")), fixture(None), fixture(Some("3")), fixture(None)];
        let out = assign(list, "cadet", &CorrectionOverlay::default());
        assert_eq!(jornadas(&out), vec![1, 2, 3, 4]);
        assert!(out.corrections.is_empty());
    }

    #[test]
    fn override_replaces_one_value_and_counter_keeps_going() {
        let overlay = CorrectionOverlay::from_json(
            r#"{"cadet": {"1001": {"jornada_real": 3, "nota": "Aplazado por piscina"}}}"#,
        )
        .unwrap();
        let list = vec![fixture(Some("1000")), fixture(Some("1001")), fixture(Some("1002"))];
        let out = assign(list, "cadet", &overlay);

        assert_eq!(jornadas(&out), vec![1, 3, 3]);
        assert_eq!(
            out.corrections,
            vec![AppliedCorrection {
                match_id: s!("1001"),
                inferred: 2,
                jornada_real: 3,
                note: s!("Aplazado por piscina"),
            }]
        );
    }

    #[test]
    fn overlay_is_scoped_by_team_key() {
        let overlay =
            CorrectionOverlay::from_json(r#"{"juvenil": {"1001": {"jornada_real": 9}}}"#).unwrap();
        let out = assign(vec![fixture(Some("1001"))], "cadet", &overlay);
        assert_eq!(jornadas(&out), vec![1]);

        let out = assign(vec![fixture(Some("1001"))], "juvenil", &overlay);
        assert_eq!(jornadas(&out), vec![9]);
        assert_eq!(out.corrections[0].note, "");
    }

    #[test]
    fn note_accepts_both_spellings() {
        let a = CorrectionOverlay::from_json(r#"{"t": {"1": {"jornada_real": 2, "note": "x"}}}"#).unwrap();
        let b = CorrectionOverlay::from_json(r#"{"t": {"1": {"jornada_real": 2, "nota": "x"}}}"#).unwrap();
        assert_eq!(a, b);
        assert!(!a.is_empty());
        assert!(CorrectionOverlay::default().is_empty());
    }

    #[test]
    fn malformed_overlay_is_an_error() {
        assert!(matches!(CorrectionOverlay::from_json("{\"t\": 3}"), Err(Error::Json(_))));
        let missing = CorrectionOverlay::load(Path::new("/nonexistent/overlay.json"));
        assert!(matches!(missing, Err(Error::Io { .. })));
    }
}
