// src/changes.rs
//! Differences between two snapshots of the same team that are worth a push
//! notification. Delivery is somebody else's job; this only says what changed.

use serde::Serialize;

use crate::model::Match;
use crate::snapshot::TeamSnapshot;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    /// The results list grew; carries the newest result.
    NewResult { result: Match },
    /// Same match id, different date or time.
    Rescheduled { old: Match, new: Match },
}

impl Change {
    pub fn message(&self) -> String {
        match self {
            Change::NewResult { result } => {
                let f = &result.fixture;
                let score = f.score.as_deref().unwrap_or("?-?");
                format!("{} {score} {}", f.team1.name, f.team2.name)
            }
            Change::Rescheduled { old, new } => format!(
                "{} - {}: {} -> {}",
                new.fixture.team1.name,
                new.fixture.team2.name,
                when(old),
                when(new)
            ),
        }
    }
}

fn when(m: &Match) -> String {
    let f = &m.fixture;
    match (&f.scheduled_date, &f.scheduled_time) {
        (Some(d), Some(t)) => format!("{d} {t}"),
        (Some(d), None) => d.clone(),
        _ => s!("?"),
    }
}

pub fn detect(old: &TeamSnapshot, new: &TeamSnapshot) -> Vec<Change> {
    let mut out = Vec::new();

    // results are listed newest first
    if new.last_results.len() > old.last_results.len() {
        if let Some(latest) = new.last_results.first() {
            out.push(Change::NewResult { result: latest.clone() });
        }
    }

    for m in &new.upcoming_matches {
        let Some(id) = m.fixture.match_id.as_deref() else { continue };
        let prev = old
            .upcoming_matches
            .iter()
            .find(|o| o.fixture.match_id.as_deref() == Some(id));
        if let Some(prev) = prev {
            let moved = prev.fixture.scheduled_date != m.fixture.scheduled_date
                || prev.fixture.scheduled_time != m.fixture.scheduled_time;
            if moved {
                out.push(Change::Rescheduled { old: prev.clone(), new: m.clone() });
            }
        }
    }

    for c in &out {
        logf!("change: {}", c.message());
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::model::{Fixture, Team};
    use crate::snapshot::{portal_offset, Metadata};

    fn snapshot(upcoming: Vec<Match>, results: Vec<Match>) -> TeamSnapshot {
        let now = Utc.with_ymd_and_hms(2024, 11, 10, 9, 0, 0).unwrap();
        TeamSnapshot {
            metadata: Metadata {
                source: s!("ACTAWP"),
                team_key: s!("cadet"),
                team_id: s!("1"),
                team_name: s!("CN Terrassa"),
                coach: s!(),
                generated_at: now,
                parser_version: s!("6.0"),
            },
            players: Vec::new(),
            team_stats: BTreeMap::new(),
            upcoming_matches: upcoming,
            last_results: results,
            ranking: Vec::new(),
            rivals_form: BTreeMap::new(),
            jornada_corrections: Vec::new(),
            last_update: now.with_timezone(&portal_offset()),
        }
    }

    fn game(id: &str, date: Option<&str>, time: Option<&str>, score: Option<&str>) -> Match {
        Match {
            jornada: 1,
            fixture: Fixture {
                match_id: Some(s!(id)),
                team1: Team::named("CN Terrassa"),
                team2: Team::named("CN Sabadell"),
                scheduled_date: date.map(String::from),
                scheduled_time: time.map(String::from),
                score: score.map(String::from),
                ..Fixture::default()
            },
        }
    }

    #[test]
    fn new_result_uses_the_newest_entry() {
        let old = snapshot(vec![], vec![game("1", None, None, Some("7-5"))]);
        let new = snapshot(vec![], vec![game("2", None, None, Some("9-8")), game("1", None, None, Some("7-5"))]);
        let changes = detect(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].message(), "CN Terrassa 9-8 CN Sabadell");
    }

    #[test]
    fn reschedule_is_matched_by_id() {
        let old = snapshot(
            vec![game("10", Some("16/11/2024"), Some("18:30"), None), game("11", Some("23/11/2024"), None, None)],
            vec![],
        );
        let new = snapshot(
            vec![game("10", Some("17/11/2024"), Some("12:00"), None), game("11", Some("23/11/2024"), None, None)],
            vec![],
        );
        let changes = detect(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0].message(),
            "CN Terrassa - CN Sabadell: 16/11/2024 18:30 -> 17/11/2024 12:00"
        );
    }

    #[test]
    fn identical_snapshots_have_no_changes() {
        let s = snapshot(vec![game("10", Some("16/11/2024"), Some("18:30"), None)], vec![]);
        assert!(detect(&s, &s).is_empty());
    }
}
