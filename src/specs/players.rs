// src/specs/players.rs
//! Roster ("players" tab) and team-stats ("stats" tab) tables.
//!
//! Roster layout:
//! ```text
//! <table><thead><tr><th title="Nombre">…</th><th><span title="Partidos jugados">PJ</span></th>…</tr></thead>
//!        <tbody><tr><td><a>Ver</a> Joan Garcia</td><td>12</td>…</tr>…</tbody></table>
//! ```
//! Headers are resolved per column, canonicalized, then zipped with each row.

use std::collections::BTreeMap;

use scraper::ElementRef;

use super::fields::{coerce, normalize_field, NAME_CODE};
use super::headers::resolve_label;
use super::{ParsedList, RowSkip};
use crate::core::html::{self, body_rows, cells, text_of, TABLE, THEAD_TH, TR};
use crate::model::{FieldValue, PlayerStatLine};

pub fn parse_roster(markup: &str) -> ParsedList<PlayerStatLine> {
    let doc = html::parse(markup);
    let Some(table) = doc.select(&TABLE).next() else {
        logd!("roster: no table");
        return ParsedList::default();
    };

    let headers: Vec<String> = table.select(&THEAD_TH).map(resolve_label).collect();
    if headers.is_empty() {
        logd!("roster: no header cells");
        return ParsedList::default();
    }

    body_rows(table)
        .into_iter()
        .enumerate()
        .fold(ParsedList::default(), |acc, (idx, row)| {
            acc.push_row("roster", idx, player_row(row, &headers))
        })
}

fn player_row(row: ElementRef<'_>, headers: &[String]) -> Result<PlayerStatLine, RowSkip> {
    let tds = cells(row);
    if tds.len() < 2 {
        return Err(RowSkip::TooFewCells(tds.len()));
    }

    // zip stops at the shorter side: extra cells past the header row are ignored
    let line: BTreeMap<String, FieldValue> = headers
        .iter()
        .zip(tds)
        .filter(|(label, _)| !label.is_empty())
        .filter_map(|(label, td)| normalize_field(label, &text_of(td)))
        .collect();

    if !line.contains_key(NAME_CODE) {
        return Err(RowSkip::MissingName);
    }
    Ok(PlayerStatLine(line))
}

/// Two-column "label | value" table. Labels are kept as the portal prints them.
pub fn parse_team_stats(markup: &str) -> BTreeMap<String, FieldValue> {
    let doc = html::parse(markup);
    let Some(table) = doc.select(&TABLE).next() else {
        return BTreeMap::new();
    };

    table
        .select(&TR)
        .filter_map(|tr| {
            let tds = cells(tr);
            let (label, value) = (tds.first()?, tds.get(1)?);
            let label = text_of(*label);
            if label.is_empty() {
                return None;
            }
            coerce(&text_of(*value)).map(|v| (label, v))
        })
        .collect()
}
