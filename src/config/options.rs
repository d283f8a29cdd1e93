// src/config/options.rs
use serde::Deserialize;

use super::consts::*;
use crate::error::Result;

/// One tracked team, as the enclosing program configures it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TeamConfig {
    /// Stable key used by the correction overlay (e.g. `cadet`).
    pub key: String,
    /// Portal team id.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub coach: String,
}

impl TeamConfig {
    /// Parse a JSON array of team configs.
    pub fn list_from_json(text: &str) -> Result<Vec<TeamConfig>> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Results kept per rival (most recent first).
    pub recent_results: usize,
    pub top_scorers: usize,
    /// Worker threads for rival fetches. 1 = sequential.
    pub workers: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            recent_results: RECENT_RESULTS,
            top_scorers: TOP_SCORERS,
            workers: WORKERS,
        }
    }
}

impl AggregateOptions {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.clamp(1, MAX_WORKERS);
        self
    }
}
