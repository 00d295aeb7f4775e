use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::PrimitiveDateTime;

/// One validated post with the six canonical fields.
///
/// Everything is stored as raw text: dates and coordinates are coerced
/// lazily by the analyses that need arithmetic, never at ingest time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub author_id: String,
    pub timestamp: String,
    pub text: String,
    pub geo_lat: String,
    pub geo_lng: String,
}

pub const FIELD_COUNT: usize = 6;

impl Record {
    /// Build a record from exactly six positional fields.
    pub fn from_fields(fields: &[&str]) -> Option<Self> {
        if fields.len() != FIELD_COUNT {
            return None;
        }
        Some(Self {
            id: fields[0].to_string(),
            author_id: fields[1].to_string(),
            timestamp: fields[2].to_string(),
            text: fields[3].to_string(),
            geo_lat: fields[4].to_string(),
            geo_lng: fields[5].to_string(),
        })
    }
}

/// Parse the fixed `YYYY-MM-DD HH:MM:SS` timestamp layout.
/// Surrounding whitespace is tolerated; anything else is an error.
pub fn parse_timestamp(raw: &str) -> Result<PrimitiveDateTime> {
    let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    PrimitiveDateTime::parse(raw.trim(), fmt)
        .map_err(|e| anyhow!("bad timestamp {:?}: {}", raw, e))
}
