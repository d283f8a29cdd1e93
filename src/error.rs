// src/error.rs
//! Error types for the few fallible boundaries of the engine.
//!
//! Parsing itself never fails: bad rows are skipped and counted. Errors only
//! come from decoding caller-supplied JSON, reading files, or a rival source
//! that could not deliver markup.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tab envelope `{tab}` is malformed: {reason}")]
    Envelope { tab: String, reason: String },

    #[error("cannot read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fetch failed for {team}: {reason}")]
    Fetch { team: String, reason: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub fn fetch(team: impl Into<String>, reason: impl ToString) -> Self {
        Error::Fetch { team: team.into(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
