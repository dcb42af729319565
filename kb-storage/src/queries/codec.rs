//! Column encodings shared by the query modules.

use chrono::{DateTime, SecondsFormat, Utc};

use kb_core::errors::{KbError, KbResult, StorageError};

/// Timestamps are stored as fixed-width RFC 3339 UTC strings so that SQL
/// string comparison orders them chronologically.
pub fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_ts(table: &str, s: &str) -> KbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| corrupt(table, format!("parse datetime '{s}': {e}")))
}

pub fn parse_opt_ts(table: &str, s: Option<String>) -> KbResult<Option<DateTime<Utc>>> {
    s.as_deref().map(|s| parse_ts(table, s)).transpose()
}

/// Convert f32 slice to bytes (little-endian).
pub fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes back to f32 vec.
pub fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

pub fn corrupt(table: &str, details: impl Into<String>) -> KbError {
    KbError::Storage(StorageError::CorruptRow {
        table: table.to_string(),
        details: details.into(),
    })
}
