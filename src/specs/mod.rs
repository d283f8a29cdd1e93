// src/specs/mod.rs
//! # Page "specs"
//!
//! One module per table kind the portal serves. Each spec encodes *where the
//! ground truth lives in the markup* and *how to extract it robustly*.
//!
//! ## What lives here
//! - `headers`: column-label resolution from tooltip/ARIA/nested-label variants.
//! - `fields`: bilingual label → short code mapping and value coercion.
//! - `players`: roster and team-stats tables.
//! - `matches`: upcoming and completed match lists (one algorithm, two modes).
//! - `ranking`: standings table.
//!
//! ## What does **not** live here
//! - Fetching, envelopes, persistence (callers / `snapshot`).
//! - Round numbering (`jornada`), rival enrichment (`rivals`).
//!
//! ## Conventions
//! - Parsers are pure functions of the markup and never fail. A row that
//!   cannot be read is skipped with a [`RowSkip`] reason and counted, so the
//!   caller can report what was dropped.
//! - A missing table yields an empty [`ParsedList`], never an error.
//! - Output keeps source row order.

pub mod fields;
pub mod headers;
pub mod matches;
pub mod players;
pub mod ranking;

use std::fmt;

/// Why a row was not emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowSkip {
    TooFewCells(usize),
    MissingScore,
    MissingTeams,
    MissingName,
    NoIdentity,
    DuplicateId(String),
}

impl fmt::Display for RowSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowSkip::TooFewCells(n) => write!(f, "only {n} cells"),
            RowSkip::MissingScore => f.write_str("no score cell"),
            RowSkip::MissingTeams => f.write_str("no team names"),
            RowSkip::MissingName => f.write_str("no player name"),
            RowSkip::NoIdentity => f.write_str("no team identity column"),
            RowSkip::DuplicateId(id) => write!(f, "duplicate match id {id}"),
        }
    }
}

/// Result of folding a table body: emitted records plus dropped-row count.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedList<T> {
    pub items: Vec<T>,
    pub skipped: usize,
}

impl<T> Default for ParsedList<T> {
    fn default() -> Self {
        Self { items: Vec::new(), skipped: 0 }
    }
}

impl<T> ParsedList<T> {
    /// Fold one row result into the list, logging drops under `what`.
    pub fn push_row(mut self, what: &str, row: usize, parsed: Result<T, RowSkip>) -> Self {
        match parsed {
            Ok(item) => self.items.push(item),
            Err(reason) => {
                logd!(row, "{what}: skipped row: {reason}");
                self.skipped += 1;
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
