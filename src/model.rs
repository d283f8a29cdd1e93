// src/model.rs
//! Typed records produced by the parsers.
//!
//! Everything here is built fresh per parse pass and never mutated after
//! construction; the snapshot assembler only moves values around.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::sanitize::{name_key, names_overlap};

/* ---------------- teams ---------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl Team {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Identity: portal id when known, else the normalized name.
    pub fn key(&self) -> String {
        match &self.external_id {
            Some(id) => id.clone(),
            None => name_key(&self.name),
        }
    }

    pub fn matches_name(&self, other: &str) -> bool {
        names_overlap(&self.name, other)
    }
}

/* ---------------- matches ---------------- */

/// One parsed row of an upcoming/completed list, before round numbering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,
    pub team1: Team,
    pub team2: Team,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_team1: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_team2: Option<i32>,
    /// Score as printed by the portal, e.g. "7-5".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
}

impl Fixture {
    pub fn is_completed(&self) -> bool {
        self.score_team1.is_some() && self.score_team2.is_some()
    }

    /// Which side `team_name` plays on, by case-insensitive containment.
    /// team1 is checked first.
    pub fn side_of(&self, team_name: &str) -> Option<Side> {
        if self.team1.matches_name(team_name) {
            Some(Side::Team1)
        } else if self.team2.matches_name(team_name) {
            Some(Side::Team2)
        } else {
            None
        }
    }

    /// (own, other) goals from one side's perspective.
    pub fn goals_for(&self, side: Side) -> Option<(i32, i32)> {
        let (g1, g2) = (self.score_team1?, self.score_team2?);
        Some(match side {
            Side::Team1 => (g1, g2),
            Side::Team2 => (g2, g1),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Team1,
    Team2,
}

/// A fixture with its round number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub jornada: u32,
    #[serde(flatten)]
    pub fixture: Fixture,
}

/* ---------------- ranking ---------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub position: u32,
    pub team: Team,
    pub points: i32,
    pub played: i32,
    pub won: i32,
    pub drawn: i32,
    pub lost: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_diff: i32,
}

/* ---------------- players ---------------- */

/// Typed cell value after coercion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Decimal(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Decimal(v) => write!(f, "{v}"),
            FieldValue::Text(v) => f.write_str(v),
        }
    }
}

/// Canonical code → value for one roster row. Always carries the name code.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerStatLine(pub BTreeMap<String, FieldValue>);

impl PlayerStatLine {
    pub fn get(&self, code: &str) -> Option<&FieldValue> {
        self.0.get(code)
    }

    pub fn int(&self, code: &str) -> Option<i64> {
        self.get(code).and_then(FieldValue::as_int)
    }

    pub fn name(&self) -> Option<String> {
        self.get(crate::specs::fields::NAME_CODE).map(ToString::to_string)
    }
}

/* ---------------- rival form ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
    #[serde(rename = "D")]
    Draw,
}

impl Outcome {
    pub fn from_goals(own: i32, other: i32) -> Self {
        match own.cmp(&other) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Outcome::Win => 'W',
            Outcome::Loss => 'L',
            Outcome::Draw => 'D',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Hot,
    Cold,
    Rising,
    Falling,
    Stable,
}

/// Top-scorer summary derived from one roster line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopScorer {
    pub name: String,
    pub goals: i64,
    pub games: i64,
    pub exclusions: i64,
    pub penalty_goals: i64,
    pub goals_per_game: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RivalForm {
    pub team_id: String,
    pub team_name: String,
    pub position: u32,
    /// Most recent first.
    pub recent_results: Vec<Match>,
    pub form: Vec<Outcome>,
    pub form_string: String,
    pub trend: Trend,
    pub aggregate_goals_for: i32,
    pub aggregate_goals_against: i32,
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
    pub top_scorers: Vec<TopScorer>,
}
