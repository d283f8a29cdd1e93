// src/rivals.rs
//! Rival form: recent results, trend and top scorers for every other team in
//! the subject's standings.
//!
//! Fetching is the caller's business ([`RivalSource`]). A rival whose results
//! cannot be fetched, or who has played nothing yet, gets no entry; the rest
//! carry on. Fetches run sequentially unless `AggregateOptions::workers > 1`,
//! in which case a small scoped pool pulls rivals off a shared counter.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use crate::config::consts::TREND_WINDOW;
use crate::config::options::AggregateOptions;
use crate::core::sanitize::names_overlap;
use crate::error::Result;
use crate::jornada::{self, CorrectionOverlay};
use crate::model::{Match, Outcome, PlayerStatLine, RankingEntry, RivalForm, Team, TopScorer, Trend};
use crate::progress::Progress;
use crate::specs::{matches, players};

/// Where rival markup comes from: HTTP in production, files or fixtures elsewhere.
pub trait RivalSource: Sync {
    fn results_markup(&self, team: &Team) -> Result<String>;
    fn roster_markup(&self, team: &Team) -> Result<String>;
}

type Built = Result<Option<RivalForm>>;

pub fn aggregate(
    subject: &str,
    ranking: &[RankingEntry],
    source: &dyn RivalSource,
    overlay: &CorrectionOverlay,
    opts: &AggregateOptions,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> BTreeMap<String, RivalForm> {
    let rivals: Vec<&RankingEntry> = ranking
        .iter()
        .filter(|e| !names_overlap(&e.team.name, subject))
        .collect();

    if let Some(p) = progress.as_deref_mut() {
        p.begin(rivals.len());
        p.log("Building rival form…");
    }

    let mut out = BTreeMap::new();
    let mut failed = 0;
    let workers = opts.workers.min(rivals.len()).max(1);

    if workers == 1 {
        for entry in &rivals {
            let built = build_one(entry, source, overlay, opts);
            failed += record(&mut out, progress.as_deref_mut(), entry, built) as usize;
        }
    } else {
        let counter = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<(usize, Built)>();

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let (rivals, counter) = (&rivals, &counter);
                scope.spawn(move || loop {
                    let i = counter.fetch_add(1, Ordering::Relaxed);
                    let Some(entry) = rivals.get(i) else { break };
                    let built = build_one(entry, source, overlay, opts);
                    if tx.send((i, built)).is_err() {
                        break;
                    }
                });
            }
            drop(tx); // main thread is sole receiver now

            for (i, built) in rx {
                failed += record(&mut out, progress.as_deref_mut(), rivals[i], built) as usize;
            }
        });
    }

    if failed > 0 && failed == rivals.len() {
        loge!("rival form: all {failed} rival fetches failed");
    }
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    out
}

fn record(
    out: &mut BTreeMap<String, RivalForm>,
    progress: Option<&mut (dyn Progress + '_)>,
    entry: &RankingEntry,
    built: Built,
) -> bool {
    let name = &entry.team.name;
    match built {
        Ok(Some(form)) => {
            if let Some(p) = progress {
                p.item_done(name);
            }
            if out.insert(name.clone(), form).is_some() {
                logw!("rival {name}: name repeated in standings, keeping the later entry");
            }
            false
        }
        Ok(None) => {
            logd!("rival {name}: no results yet");
            if let Some(p) = progress {
                p.item_failed(name, "no results");
            }
            false
        }
        Err(e) => {
            logw!("rival {name}: {e}");
            if let Some(p) = progress {
                p.item_failed(name, &e.to_string());
            }
            true
        }
    }
}

fn build_one(
    entry: &RankingEntry,
    source: &dyn RivalSource,
    overlay: &CorrectionOverlay,
    opts: &AggregateOptions,
) -> Built {
    let team = &entry.team;
    let markup = source.results_markup(team)?;
    let parsed = matches::parse_completed(&markup);
    let results = jornada::assign(parsed.items, &team.key(), overlay).matches;

    let top = match source.roster_markup(team) {
        Ok(markup) => top_scorers(&players::parse_roster(&markup).items, opts.top_scorers),
        Err(e) => {
            logw!("rival {}: roster unavailable: {e}", team.name);
            Vec::new()
        }
    };

    Ok(form_for(entry, results, opts.recent_results).map(|form| RivalForm { top_scorers: top, ..form }))
}

/// Form over the `limit` most recent results the rival actually played in.
/// `None` when there are none.
pub fn form_for(entry: &RankingEntry, results: Vec<Match>, limit: usize) -> Option<RivalForm> {
    let name = &entry.team.name;

    let (recent, goals): (Vec<Match>, Vec<(i32, i32)>) = results
        .into_iter()
        .filter_map(|m| {
            let side = m.fixture.side_of(name);
            let goals = side.and_then(|s| m.fixture.goals_for(s));
            if goals.is_none() {
                logd!("rival {name}: match {:?} not attributable", m.fixture.match_id);
            }
            goals.map(|g| (m, g))
        })
        .take(limit)
        .unzip();

    if recent.is_empty() {
        return None;
    }

    let form: Vec<Outcome> = goals.iter().map(|&(own, other)| Outcome::from_goals(own, other)).collect();
    let scored: i32 = goals.iter().map(|g| g.0).sum();
    let conceded: i32 = goals.iter().map(|g| g.1).sum();
    let n = goals.len() as f64;

    Some(RivalForm {
        team_id: entry.team.key(),
        team_name: name.clone(),
        position: entry.position,
        form_string: form.iter().map(|o| o.letter()).collect(),
        trend: trend(&form),
        aggregate_goals_for: scored,
        aggregate_goals_against: conceded,
        avg_goals_for: round_to(scored as f64 / n, 1),
        avg_goals_against: round_to(conceded as f64 / n, 1),
        recent_results: recent,
        form,
        top_scorers: Vec::new(),
    })
}

/// Trend over the most recent results (newest first).
pub fn trend(form: &[Outcome]) -> Trend {
    let window = &form[..form.len().min(TREND_WINDOW)];
    let wins = window.iter().filter(|o| **o == Outcome::Win).count();
    let losses = window.iter().filter(|o| **o == Outcome::Loss).count();

    if wins >= 2 {
        Trend::Hot
    } else if losses >= 2 {
        Trend::Cold
    } else if wins > losses {
        Trend::Rising
    } else if losses > wins {
        Trend::Falling
    } else {
        Trend::Stable
    }
}

/// Goals prefer the total column (`GT`) and fall back to `G`.
pub fn top_scorers(roster: &[PlayerStatLine], limit: usize) -> Vec<TopScorer> {
    let mut scorers: Vec<TopScorer> = roster
        .iter()
        .filter_map(|line| {
            let name = line.name()?;
            let goals = line.int("GT").or_else(|| line.int("G")).unwrap_or(0);
            let games = line.int("PJ").unwrap_or(0);
            if goals == 0 && games == 0 {
                return None;
            }
            let goals_per_game = if games > 0 { round_to(goals as f64 / games as f64, 2) } else { 0.0 };
            Some(TopScorer {
                name,
                goals,
                games,
                exclusions: line.int("EX").unwrap_or(0),
                penalty_goals: line.int("GP").unwrap_or(0),
                goals_per_game,
            })
        })
        .collect();

    // stable: ties keep roster order
    scorers.sort_by(|a, b| b.goals.cmp(&a.goals));
    scorers.truncate(limit);
    scorers
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    (v * f).round() / f
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{FieldValue, Fixture};
    use crate::progress::Recorder;

    fn entry(pos: u32, name: &str) -> RankingEntry {
        RankingEntry { position: pos, team: Team::named(name), ..RankingEntry::default() }
    }

    fn result(t1: &str, t2: &str, g1: i32, g2: i32) -> Match {
        Match {
            jornada: 0,
            fixture: Fixture {
                team1: Team::named(t1),
                team2: Team::named(t2),
                score_team1: Some(g1),
                score_team2: Some(g2),
                ..Fixture::default()
            },
        }
    }

    #[test]
    fn trend_rules() {
        use Outcome::*;
        assert_eq!(trend(&[Win, Win, Loss, Draw, Win]), Trend::Hot);
        assert_eq!(trend(&[Loss, Draw, Loss]), Trend::Cold);
        assert_eq!(trend(&[Win, Draw, Draw, Loss, Loss]), Trend::Rising);
        assert_eq!(trend(&[Draw, Loss]), Trend::Falling);
        assert_eq!(trend(&[Win, Loss, Draw]), Trend::Stable);
        assert_eq!(trend(&[]), Trend::Stable);
    }

    #[test]
    fn form_is_read_from_the_rival_side() {
        let results = vec![
            result("CN Mataró", "CN Rubí", 9, 4),
            result("CN Rubí", "CN Mataró", 6, 8),
            result("CN Mataró", "UE Horta", 5, 7),
            result("UE Horta", "CN Mataró", 6, 6),
            result("CN Mataró", "CN Sant Feliu", 10, 3),
            result("CN Mataró", "CE Mediterrani", 1, 0),
        ];
        let form = form_for(&entry(4, "CN Mataró"), results, 5).unwrap();

        assert_eq!(form.form_string, "WWLDW");
        assert_eq!(form.trend, Trend::Hot);
        assert_eq!(form.recent_results.len(), 5);
        assert_eq!(form.aggregate_goals_for, 38);
        assert_eq!(form.aggregate_goals_against, 26);
        assert_eq!(form.avg_goals_for, 7.6);
        assert_eq!(form.avg_goals_against, 5.2);
        assert_eq!(form.position, 4);
        assert_eq!(form.team_id, "cn mataró");
    }

    #[test]
    fn unattributable_matches_are_skipped() {
        let other = || result("UE Horta", "CE Mediterrani", 1, 0);
        let results = vec![other(), result("CN Rubí", "CN Sabadell", 2, 2)];
        let form = form_for(&entry(2, "CN Rubí"), results, 5).unwrap();
        assert_eq!(form.form_string, "D");
        assert_eq!(form.recent_results.len(), 1);
        assert!(form_for(&entry(2, "CN Rubí"), vec![other()], 5).is_none());
    }

    fn line(pairs: &[(&str, i64)], name: &str) -> PlayerStatLine {
        let mut m: BTreeMap<String, FieldValue> =
            pairs.iter().map(|(k, v)| (s!(*k), FieldValue::Int(*v))).collect();
        m.insert(s!("Nombre"), FieldValue::Text(s!(name)));
        PlayerStatLine(m)
    }

    #[test]
    fn top_scorers_sort_stably_and_prefer_total_goals() {
        let roster = vec![
            line(&[("PJ", 3), ("G", 4)], "Anna"),
            line(&[("PJ", 6), ("GT", 14), ("G", 12), ("EX", 2), ("GP", 3)], "Berta"),
            line(&[("PJ", 0), ("G", 0)], "Carla"),
            line(&[("PJ", 7), ("G", 4)], "Dana"),
            line(&[("PJ", 2)], "Eva"),
        ];
        let top = top_scorers(&roster, 3);
        let names: Vec<_> = top.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Berta", "Anna", "Dana"]);
        assert_eq!(top[0].goals, 14);
        assert_eq!(top[0].exclusions, 2);
        assert_eq!(top[0].penalty_goals, 3);
        assert_eq!(top[0].goals_per_game, 2.33);
        assert_eq!(top[2].goals_per_game, 0.57);
    }

    /* ---------- aggregate ---------- */

    struct Fixtures;

    const RUBI: &str = r#"<table><tbody>
        <tr><td><span class="ellipsis">CN Rubí</span></td><td>8-6</td><td><span class="ellipsis">UE Horta</span></td></tr>
        <tr><td><span class="ellipsis">CN Mataró</span></td><td>9-9</td><td><span class="ellipsis">CN Rubí</span></td></tr>
    </tbody></table>"#;

    const ROSTER: &str = r#"<table><thead><tr><th>Nombre</th><th>PJ</th><th>Goles</th></tr></thead>
        <tbody><tr><td>Ver Laia Vidal</td><td>2</td><td>5</td></tr></tbody></table>"#;

    impl RivalSource for Fixtures {
        fn results_markup(&self, team: &Team) -> Result<String> {
            match team.name.as_str() {
                "CN Rubí" => Ok(s!(RUBI)),
                "UE Horta" => Ok(s!("<table><tbody></tbody></table>")),
                other => Err(Error::fetch(other, "HTTP 503")),
            }
        }

        fn roster_markup(&self, team: &Team) -> Result<String> {
            match team.name.as_str() {
                "CN Rubí" => Ok(s!(ROSTER)),
                other => Err(Error::fetch(other, "HTTP 404")),
            }
        }
    }

    fn standings() -> Vec<RankingEntry> {
        vec![
            entry(1, "CN Terrassa Cadet"),
            entry(2, "CN Rubí"),
            entry(3, "UE Horta"),
            entry(4, "CN Mataró"),
        ]
    }

    #[test]
    fn failures_are_isolated_and_subject_is_excluded() {
        let mut rec = Recorder::default();
        let out = aggregate(
            "cn terrassa",
            &standings(),
            &Fixtures,
            &CorrectionOverlay::default(),
            &AggregateOptions::default(),
            Some(&mut rec),
        );

        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["CN Rubí"]);
        let rubi = &out["CN Rubí"];
        assert_eq!(rubi.form_string, "WD");
        assert_eq!(rubi.trend, Trend::Rising);
        assert_eq!(rubi.top_scorers.len(), 1);
        assert_eq!(rubi.top_scorers[0].name, "Laia Vidal");
        assert_eq!(rubi.recent_results[0].jornada, 1);

        assert_eq!(rec.total, Some(3));
        assert_eq!(rec.done, vec!["CN Rubí"]);
        assert_eq!(rec.failed.len(), 2);
        assert!(rec.finished);
    }

    #[test]
    fn worker_pool_gives_the_same_map() {
        let overlay = CorrectionOverlay::default();
        let seq = aggregate("CN Terrassa", &standings(), &Fixtures, &overlay, &AggregateOptions::default(), None);
        let par = aggregate(
            "CN Terrassa",
            &standings(),
            &Fixtures,
            &overlay,
            &AggregateOptions::default().with_workers(4),
            None,
        );
        assert_eq!(seq, par);
    }

    #[test]
    fn repeated_standings_name_keeps_the_later_entry() {
        let standings = vec![entry(2, "CN Rubí"), entry(5, "CN Rubí")];
        let out = aggregate(
            "CN Terrassa",
            &standings,
            &Fixtures,
            &CorrectionOverlay::default(),
            &AggregateOptions::default(),
            None,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out["CN Rubí"].position, 5);
    }

    #[test]
    fn every_rival_failing_gives_an_empty_map_with_progress_through_the_pool() {
        let standings = vec![entry(1, "CN Terrassa"), entry(2, "CN Mataró"), entry(3, "CN Sabadell")];
        let mut rec = Recorder::default();
        let out = aggregate(
            "CN Terrassa",
            &standings,
            &Fixtures,
            &CorrectionOverlay::default(),
            &AggregateOptions::default().with_workers(2),
            Some(&mut rec),
        );
        assert!(out.is_empty());
        assert_eq!(rec.total, Some(2));
        assert!(rec.done.is_empty());
        assert_eq!(rec.failed.len(), 2);
        assert!(rec.finished);
    }
}
