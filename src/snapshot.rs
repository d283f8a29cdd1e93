// src/snapshot.rs
//! One team's aggregate record: everything the portal knows about the team at
//! one point in time, with round numbers applied and rival form attached.
//!
//! The portal serves each team tab as a small JSON envelope:
//! ```json
//! { "code": 0, "content": "<div class=\"table-responsive\"><table>…</table></div>" }
//! ```
//! A non-zero code means the tab has nothing to show.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::config::consts::{PARSER_VERSION, SOURCE, UTC_OFFSET_HOURS};
use crate::config::options::{AggregateOptions, TeamConfig};
use crate::error::{Error, Result};
use crate::jornada::{self, AppliedCorrection, CorrectionOverlay};
use crate::model::{FieldValue, Match, PlayerStatLine, RankingEntry, RivalForm};
use crate::progress::Progress;
use crate::rivals::{self, RivalSource};
use crate::specs::{matches, players, ranking, ParsedList};

#[derive(Deserialize)]
struct TabEnvelope {
    code: i64,
    #[serde(default)]
    content: Option<String>,
}

/// Unwrap a tab envelope. `Ok(None)` when the portal reports no content.
pub fn decode_tab(tab: &str, json: &str) -> Result<Option<String>> {
    let env: TabEnvelope = serde_json::from_str(json).map_err(|e| Error::Envelope {
        tab: s!(tab),
        reason: e.to_string(),
    })?;
    if env.code != 0 {
        logd!("{tab}: envelope code {}", env.code);
        return Ok(None);
    }
    Ok(env.content.filter(|c| !c.trim().is_empty()))
}

/// Already-unwrapped markup per section. `None` = section absent.
#[derive(Clone, Debug, Default)]
pub struct TabInputs {
    pub players: Option<String>,
    pub stats: Option<String>,
    pub upcoming: Option<String>,
    pub results: Option<String>,
    pub ranking: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub source: String,
    pub team_key: String,
    pub team_id: String,
    pub team_name: String,
    pub coach: String,
    pub generated_at: DateTime<Utc>,
    pub parser_version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub metadata: Metadata,
    pub players: Vec<PlayerStatLine>,
    pub team_stats: BTreeMap<String, FieldValue>,
    pub upcoming_matches: Vec<Match>,
    /// Most recent first, as the portal lists them.
    pub last_results: Vec<Match>,
    pub ranking: Vec<RankingEntry>,
    pub rivals_form: BTreeMap<String, RivalForm>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jornada_corrections: Vec<AppliedCorrection>,
    pub last_update: DateTime<FixedOffset>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Count {
    pub parsed: usize,
    pub skipped: usize,
}

impl<T> From<&ParsedList<T>> for Count {
    fn from(list: &ParsedList<T>) -> Self {
        Count { parsed: list.len(), skipped: list.skipped }
    }
}

/// What each section yielded, so dropped rows stay visible to the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SectionCounts {
    pub players: Count,
    pub team_stats: usize,
    pub upcoming: Count,
    pub results: Count,
    pub ranking: Count,
    pub rivals: usize,
    pub corrections: usize,
}

/// The portal's wall clock: fixed UTC+1.
pub fn portal_offset() -> FixedOffset {
    FixedOffset::east_opt(UTC_OFFSET_HOURS * 3600).unwrap_or_else(|| Utc.fix())
}

fn parsed_or_empty<T>(markup: Option<&str>, parse: impl Fn(&str) -> ParsedList<T>) -> ParsedList<T> {
    markup.map(parse).unwrap_or_default()
}

impl TeamSnapshot {
    /// Parse every available section and stitch the record together.
    /// Rival form is only built when both a ranking and a source are present.
    pub fn assemble(
        team: &TeamConfig,
        inputs: &TabInputs,
        overlay: &CorrectionOverlay,
        rival_source: Option<&dyn RivalSource>,
        opts: &AggregateOptions,
        now: DateTime<Utc>,
        mut progress: Option<&mut (dyn Progress + '_)>,
    ) -> (TeamSnapshot, SectionCounts) {
        let mut counts = SectionCounts::default();

        let roster = parsed_or_empty(inputs.players.as_deref(), players::parse_roster);
        let upcoming = parsed_or_empty(inputs.upcoming.as_deref(), matches::parse_upcoming);
        let results = parsed_or_empty(inputs.results.as_deref(), matches::parse_completed);
        let standings = parsed_or_empty(inputs.ranking.as_deref(), ranking::parse_ranking);
        let team_stats = inputs.stats.as_deref().map(players::parse_team_stats).unwrap_or_default();

        counts.players = Count::from(&roster);
        counts.team_stats = team_stats.len();
        counts.upcoming = Count::from(&upcoming);
        counts.results = Count::from(&results);
        counts.ranking = Count::from(&standings);

        if let Some(p) = progress.as_deref_mut() {
            for (name, c) in [
                ("players", counts.players),
                ("upcoming", counts.upcoming),
                ("results", counts.results),
                ("ranking", counts.ranking),
            ] {
                p.section(name, c.parsed, c.skipped);
            }
            p.section("team_stats", counts.team_stats, 0);
        }

        let upcoming = jornada::assign(upcoming.items, &team.key, overlay);
        let results = jornada::assign(results.items, &team.key, overlay);
        let mut corrections = upcoming.corrections;
        corrections.extend(results.corrections);
        counts.corrections = corrections.len();

        let rivals_form = match rival_source {
            Some(source) if !standings.is_empty() => {
                rivals::aggregate(&team.name, &standings.items, source, overlay, opts, progress.as_deref_mut())
            }
            _ => BTreeMap::new(),
        };
        counts.rivals = rivals_form.len();

        logf!(
            team = %team.key,
            players = counts.players.parsed,
            upcoming = counts.upcoming.parsed,
            results = counts.results.parsed,
            ranking = counts.ranking.parsed,
            rivals = counts.rivals,
            "snapshot assembled"
        );

        let snapshot = TeamSnapshot {
            metadata: Metadata {
                source: s!(SOURCE),
                team_key: team.key.clone(),
                team_id: team.id.clone(),
                team_name: team.name.clone(),
                coach: team.coach.clone(),
                generated_at: now,
                parser_version: s!(PARSER_VERSION),
            },
            players: roster.items,
            team_stats,
            upcoming_matches: upcoming.matches,
            last_results: results.matches,
            ranking: standings.items,
            rivals_form,
            jornada_corrections: corrections,
            last_update: now.with_timezone(&portal_offset()),
        };
        (snapshot, counts)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
