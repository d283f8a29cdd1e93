// src/cli.rs
//! Offline harness: assemble one snapshot from a directory of saved tabs.
//!
//! ```text
//! <dir>/players.json  stats.json  upcoming.json  results.json   (tab envelopes)
//! <dir>/ranking.html                                           (standings page)
//! <dir>/rivals/<team key>/results.json  players.json           (optional)
//! ```

use std::path::{Path, PathBuf};
use std::{env, fs};

use chrono::Utc;
use color_eyre::eyre::{bail, eyre, Result, WrapErr};

use crate::changes;
use crate::config::options::{AggregateOptions, TeamConfig};
use crate::error::Error;
use crate::jornada::CorrectionOverlay;
use crate::model::Team;
use crate::progress::Progress;
use crate::rivals::RivalSource;
use crate::snapshot::{decode_tab, TabInputs, TeamSnapshot};

const HELP: &str = "\
Usage: cli -d <dir> (--teams <teams.json> -k <key> | --name <team name>) [options]

  -d, --dir <path>         directory with saved tab fragments
      --teams <path>       JSON array of team configs
  -k, --key <key>          team key to pick from --teams (also the overlay key)
      --name <name>        ad-hoc team name when no --teams file is given
      --overlay <path>     jornada correction overlay
      --workers <n>        concurrent rival workers (default 1)
      --previous <path>    earlier snapshot; changes are reported on stderr
  -o, --out <path>         write JSON here instead of stdout
  -v, --verbose            debug logging
  -h, --help               this text";

#[derive(Debug, Default)]
pub struct Params {
    pub dir: Option<PathBuf>,
    pub teams: Option<PathBuf>,
    pub key: Option<String>,
    pub name: Option<String>,
    pub overlay: Option<PathBuf>,
    pub workers: usize,
    pub previous: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub verbose: bool,
}

pub fn run() -> Result<()> {
    let params = parse_cli(env::args().skip(1))?;
    crate::log::init(if params.verbose { "debug" } else { "info" });

    let dir = params.dir.clone().ok_or_else(|| eyre!("missing --dir\n\n{HELP}"))?;
    let team = resolve_team(&params)?;
    let overlay = match &params.overlay {
        Some(p) => CorrectionOverlay::load(p)?,
        None => CorrectionOverlay::default(),
    };

    let inputs = TabInputs {
        players: read_tab(&dir, "players")?,
        stats: read_tab(&dir, "stats")?,
        upcoming: read_tab(&dir, "upcoming")?,
        results: read_tab(&dir, "results")?,
        ranking: read_optional(&dir.join("ranking.html"))?,
    };

    let source = DirSource { root: dir.join("rivals") };
    let opts = AggregateOptions::default().with_workers(params.workers.max(1));
    let mut progress = StderrProgress;

    let (snapshot, counts) = TeamSnapshot::assemble(
        &team,
        &inputs,
        &overlay,
        Some(&source),
        &opts,
        Utc::now(),
        Some(&mut progress),
    );
    logd!("{counts:?}");

    if let Some(prev) = &params.previous {
        let text = fs::read_to_string(prev).map_err(|e| Error::io(prev, e))?;
        let old = TeamSnapshot::from_json(&text)?;
        for c in changes::detect(&old, &snapshot) {
            eprintln!("{}", c.message());
        }
    }

    let json = snapshot.to_json()?;
    match &params.out {
        Some(path) => {
            fs::write(path, json).wrap_err_with(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn parse_cli(args: impl IntoIterator<Item = String>) -> Result<Params> {
    let mut params = Params { workers: 1, ..Params::default() };
    let mut args = args.into_iter();

    while let Some(a) = args.next() {
        let mut value = |flag: &str| args.next().ok_or_else(|| eyre!("missing value for {flag}"));
        match a.as_str() {
            "-d" | "--dir" => params.dir = Some(PathBuf::from(value(&a)?)),
            "--teams" => params.teams = Some(PathBuf::from(value(&a)?)),
            "-k" | "--key" => params.key = Some(value(&a)?),
            "--name" => params.name = Some(value(&a)?),
            "--overlay" => params.overlay = Some(PathBuf::from(value(&a)?)),
            "--workers" => {
                params.workers = value(&a)?.parse().wrap_err("--workers expects a number")?;
            }
            "--previous" => params.previous = Some(PathBuf::from(value(&a)?)),
            "-o" | "--out" => params.out = Some(PathBuf::from(value(&a)?)),
            "-v" | "--verbose" => params.verbose = true,
            "-h" | "--help" => {
                eprintln!("{HELP}");
                std::process::exit(0);
            }
            _ => bail!("unknown arg: {a}"),
        }
    }
    Ok(params)
}

fn resolve_team(params: &Params) -> Result<TeamConfig> {
    match (&params.teams, &params.name) {
        (Some(path), _) => {
            let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
            let teams = TeamConfig::list_from_json(&text)?;
            let key = params.key.as_deref().ok_or_else(|| eyre!("--teams needs -k <key>"))?;
            teams
                .into_iter()
                .find(|t| t.key == key)
                .ok_or_else(|| eyre!("no team with key `{key}` in {}", path.display()))
        }
        (None, Some(name)) => Ok(TeamConfig {
            key: params.key.clone().unwrap_or_else(|| s!("team")),
            id: s!(),
            name: name.clone(),
            coach: s!(),
        }),
        (None, None) => bail!("give --teams with -k, or --name\n\n{HELP}"),
    }
}

/* ---------------- files ---------------- */

fn read_optional(path: &Path) -> crate::Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    fs::read_to_string(path).map(Some).map_err(|e| Error::io(path, e))
}

/// `<dir>/<tab>.json`, unwrapped. Missing file = absent section.
fn read_tab(dir: &Path, tab: &str) -> crate::Result<Option<String>> {
    match read_optional(&dir.join(format!("{tab}.json")))? {
        Some(json) => decode_tab(tab, &json),
        None => Ok(None),
    }
}

/// Rival pages saved under `rivals/<team key>/`.
pub struct DirSource {
    pub root: PathBuf,
}

impl DirSource {
    fn tab(&self, team: &Team, tab: &str) -> crate::Result<String> {
        read_tab(&self.root.join(team.key()), tab)?
            .ok_or_else(|| Error::fetch(&team.name, format!("no saved {tab} tab")))
    }
}

impl RivalSource for DirSource {
    fn results_markup(&self, team: &Team) -> crate::Result<String> {
        self.tab(team, "results")
    }

    fn roster_markup(&self, team: &Team) -> crate::Result<String> {
        self.tab(team, "players")
    }
}

struct StderrProgress;

impl Progress for StderrProgress {
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn section(&mut self, name: &str, parsed: usize, skipped: usize) {
        if skipped > 0 {
            eprintln!("{name}: {parsed} rows ({skipped} skipped)");
        } else {
            eprintln!("{name}: {parsed} rows");
        }
    }

    fn item_failed(&mut self, label: &str, reason: &str) {
        eprintln!("  {label}: {reason}");
    }
}
