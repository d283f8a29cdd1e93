// src/specs/matches.rs
//! Upcoming-matches and last-results lists.
//!
//! Both tabs render one match per `<tr>`:
//! ```text
//! upcoming:  [team1 + logo + match link] [Sáb, 12/10/2024 18:00 - Piscina Municipal] [team2 + logo]
//! completed: [team1 + logo + match link] [7-5]                                       [team2 + logo]
//! ```
//! Team names sit in `span.ellipsis` when the page is recent; older markup
//! only has the cell text, prefixed with a position number.
//!
//! The output is a list of [`Fixture`]s in row order. Round numbers are added
//! afterwards by `jornada::assign`.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

use super::{ParsedList, RowSkip};
use crate::core::html::{self, absolutize, attr, body_rows, cells, first, text_of, IMG, LABEL_SPAN, LINK, TABLE};
use crate::core::sanitize::strip_leading_ordinal;
use crate::model::{Fixture, Team};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListMode {
    Upcoming,
    Completed,
}

impl ListMode {
    fn label(self) -> &'static str {
        match self {
            ListMode::Upcoming => "upcoming",
            ListMode::Completed => "results",
        }
    }
}

static SCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\d/–-])(\d{1,3})\s*[-–]\s*(\d{1,3})(?:[^\d/–-]|$)").expect("valid score regex")
});
static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}/\d{1,2}/\d{4})\b").expect("valid date regex"));
static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2}/\d{1,2}/\d{4})\s+(\d{1,2}:\d{2})(?:h\b|\b)").expect("valid date-time regex")
});
static MATCH_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/match/(\d+)").expect("valid match id regex"));
static TEAM_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/team/(\d+)").expect("valid team id regex"));

pub fn parse_upcoming(markup: &str) -> ParsedList<Fixture> {
    parse_list(markup, ListMode::Upcoming)
}

pub fn parse_completed(markup: &str) -> ParsedList<Fixture> {
    parse_list(markup, ListMode::Completed)
}

pub fn parse_list(markup: &str, mode: ListMode) -> ParsedList<Fixture> {
    let doc = html::parse(markup);
    let Some(table) = doc.select(&TABLE).next() else {
        logd!("{}: no table", mode.label());
        return ParsedList::default();
    };

    let mut seen: HashSet<String> = HashSet::new();
    body_rows(table)
        .into_iter()
        .enumerate()
        .fold(ParsedList::default(), |acc, (idx, row)| {
            let parsed = match_row(row, mode).and_then(|f| {
                if let Some(id) = &f.match_id {
                    if !seen.insert(id.clone()) {
                        return Err(RowSkip::DuplicateId(id.clone()));
                    }
                }
                Ok(f)
            });
            acc.push_row(mode.label(), idx, parsed)
        })
}

fn match_row(row: ElementRef<'_>, mode: ListMode) -> Result<Fixture, RowSkip> {
    let tds = cells(row);
    if tds.len() < 3 {
        return Err(RowSkip::TooFewCells(tds.len()));
    }
    let (home, interior, away) = (tds[0], &tds[1..tds.len() - 1], tds[tds.len() - 1]);

    let detail_url = detail_link(home).map(absolutize);
    let match_id = detail_url
        .as_deref()
        .and_then(|u| MATCH_ID.captures(u))
        .map(|c| s!(&c[1]));

    let mut fixture = Fixture {
        match_id,
        team1: team_from_cell(home),
        team2: team_from_cell(away),
        detail_url,
        ..Fixture::default()
    };

    match mode {
        ListMode::Completed => {
            let (g1, g2, literal) = interior.iter().find_map(|td| score_of(*td)).ok_or(RowSkip::MissingScore)?;
            fixture.score_team1 = Some(g1);
            fixture.score_team2 = Some(g2);
            fixture.score = Some(literal);
            fixture.scheduled_date = interior
                .iter()
                .find_map(|td| DATE.captures(&text_of(*td)).map(|c| s!(&c[1])));
        }
        ListMode::Upcoming => {
            if fixture.team1.name.is_empty() && fixture.team2.name.is_empty() {
                return Err(RowSkip::MissingTeams);
            }
            let joined = interior.iter().map(|td| text_of(*td)).collect::<Vec<_>>().join(" ");
            if let Some(c) = DATE_TIME.captures(&joined) {
                fixture.scheduled_date = Some(s!(&c[1]));
                fixture.scheduled_time = Some(s!(&c[2]));
                fixture.venue = c.get(0).and_then(|m| venue_after(&joined[m.end()..]));
            }
        }
    }
    Ok(fixture)
}

/* ---------------- helpers ---------------- */

/// Team name from the inline label, else cell text minus a leading position.
pub(crate) fn team_from_cell(td: ElementRef<'_>) -> Team {
    let name = first(td, &LABEL_SPAN)
        .map(text_of)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| strip_leading_ordinal(&text_of(td)));

    let logo_url = first(td, &IMG).and_then(|img| attr(img, "src")).map(absolutize);

    let external_id = td
        .select(&LINK)
        .filter_map(|a| attr(a, "href"))
        .find_map(|href| TEAM_ID.captures(href).map(|c| s!(&c[1])));

    Team { name, logo_url, external_id }
}

/// Prefer the link that points at the match sheet; else the first link.
fn detail_link(td: ElementRef<'_>) -> Option<&str> {
    let hrefs: Vec<&str> = td.select(&LINK).filter_map(|a| attr(a, "href")).collect();
    hrefs
        .iter()
        .find(|h| MATCH_ID.is_match(h))
        .or_else(|| hrefs.first())
        .copied()
}

fn score_of(td: ElementRef<'_>) -> Option<(i32, i32, String)> {
    let text = text_of(td);
    let c = SCORE.captures(&text)?;
    let g1 = c[1].parse().ok()?;
    let g2 = c[2].parse().ok()?;
    Some((g1, g2, text))
}

/// "- Piscina Municipal" → "Piscina Municipal".
fn venue_after(rest: &str) -> Option<String> {
    let v = rest.trim().trim_start_matches(&['-', '–', '|', ','][..]).trim();
    non_empty!(v)
}
