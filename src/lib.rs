// src/lib.rs
//! Extraction and normalization engine for ACTAWP team pages.
//!
//! The crate never touches the network. Callers hand it already-retrieved
//! tab fragments (see [`snapshot::decode_tab`]) and get typed records back.

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod changes;
pub mod config;
pub mod core;
pub mod error;
pub mod jornada;
pub mod model;
pub mod progress;
pub mod rivals;
pub mod snapshot;
pub mod specs;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};
