// src/specs/ranking.rs
//! Standings ("classificació") table.
//!
//! Column layout drifts between competitions: some pages lead with a position
//! cell, some with a movement arrow, some put the badge first. The only stable
//! anchor is the *team identity* column. Everything strictly after it is the
//! statistics block, read positionally in [`STAT_COLUMNS`] order.
//!
//! This positional read is fragile by nature; the tests pin the order.

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

use super::matches::team_from_cell;
use super::{ParsedList, RowSkip};
use crate::core::html::{self, body_rows, cells, has, text_of, IMG, LABEL_SPAN, RANKING_TABLE, TABLE};
use crate::model::RankingEntry;

/// Text probe threshold: a team name is longer than this.
const MIN_NAME_CHARS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatField {
    Points,
    Played,
    Won,
    Drawn,
    Lost,
    GoalsFor,
    GoalsAgainst,
    GoalDiff,
}

pub const STAT_COLUMNS: [StatField; 8] = [
    StatField::Points,
    StatField::Played,
    StatField::Won,
    StatField::Drawn,
    StatField::Lost,
    StatField::GoalsFor,
    StatField::GoalsAgainst,
    StatField::GoalDiff,
];

type IdentityProbe = for<'a> fn(ElementRef<'a>) -> bool;

/// Tried in order; each probe scans the whole row before the next one runs.
const IDENTITY_PROBES: [IdentityProbe; 2] = [has_badge_or_label, has_name_like_text];

static SIGNED_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+$").expect("valid signed int regex"));

pub fn parse_ranking(markup: &str) -> ParsedList<RankingEntry> {
    let doc = html::parse(markup);
    let Some(table) = doc.select(&RANKING_TABLE).next().or_else(|| doc.select(&TABLE).next()) else {
        logd!("ranking: no table");
        return ParsedList::default();
    };

    let mut out = body_rows(table)
        .into_iter()
        .enumerate()
        .fold(ParsedList::default(), |acc, (idx, row)| {
            let parsed = ranking_row(row);
            if let Err(reason) = &parsed {
                logw!(row = idx, "ranking: dropped row: {reason}");
            }
            acc.push_row("ranking", idx, parsed)
        });

    // contiguous over emitted rows
    for (i, entry) in out.items.iter_mut().enumerate() {
        entry.position = i as u32 + 1;
    }
    out
}

/// Index of the identity cell, or `None` when no probe matches.
pub fn identity_column(tds: &[ElementRef<'_>]) -> Option<usize> {
    IDENTITY_PROBES
        .iter()
        .find_map(|probe| tds.iter().position(|td| probe(*td)))
}

fn ranking_row(row: ElementRef<'_>) -> Result<RankingEntry, RowSkip> {
    let tds = cells(row);
    let idx = identity_column(&tds).ok_or(RowSkip::NoIdentity)?;

    let team = team_from_cell(tds[idx]);
    if team.name.is_empty() {
        return Err(RowSkip::NoIdentity);
    }

    let mut entry = RankingEntry { team, ..RankingEntry::default() };
    for (field, td) in STAT_COLUMNS.iter().zip(&tds[idx + 1..]) {
        // a non-numeric cell leaves its field at 0; later fields keep their slots
        if let Some(v) = stat_value(&text_of(*td)) {
            set_stat(&mut entry, *field, v);
        }
    }
    Ok(entry)
}

fn has_badge_or_label(td: ElementRef<'_>) -> bool {
    has(td, &IMG) || has(td, &LABEL_SPAN)
}

fn has_name_like_text(td: ElementRef<'_>) -> bool {
    let t = text_of(td);
    t.chars().count() > MIN_NAME_CHARS && !t.chars().all(|c| c.is_ascii_digit() || c.is_whitespace())
}

/// Integer with optional sign. Accepts the typographic minus some pages use.
fn stat_value(text: &str) -> Option<i32> {
    let t = text.trim().replace('−', "-");
    if !SIGNED_INT.is_match(&t) {
        return None;
    }
    t.trim_start_matches('+').parse().ok()
}

fn set_stat(entry: &mut RankingEntry, field: StatField, v: i32) {
    match field {
        StatField::Points => entry.points = v,
        StatField::Played => entry.played = v,
        StatField::Won => entry.won = v,
        StatField::Drawn => entry.drawn = v,
        StatField::Lost => entry.lost = v,
        StatField::GoalsFor => entry.goals_for = v,
        StatField::GoalsAgainst => entry.goals_against = v,
        StatField::GoalDiff => entry.goal_diff = v,
    }
}
