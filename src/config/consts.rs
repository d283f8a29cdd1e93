// src/config/consts.rs

// Portal
pub const BASE_ORIGIN: &str = "https://actawp.natacio.cat";
pub const SOURCE: &str = "ACTAWP";
pub const PARSER_VERSION: &str = "6.0";

// Output timestamps are stamped in the portal's fixed offset (CET, no DST).
pub const UTC_OFFSET_HOURS: i32 = 1;

// Rival form
pub const RECENT_RESULTS: usize = 5;
pub const TOP_SCORERS: usize = 5;
pub const TREND_WINDOW: usize = 3;

// Concurrency
pub const WORKERS: usize = 1; // sequential unless asked
pub const MAX_WORKERS: usize = 8;
