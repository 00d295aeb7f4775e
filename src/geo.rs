//! Coordinate coercion: the lat/lng fields carry noise ("51.5074N",
//! trailing quotes, stray whitespace), so strip to numeric characters
//! before parsing.

use regex::Regex;
use std::sync::OnceLock;

fn noise_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9.\-]").unwrap())
}

/// Strip non-numeric noise and parse. `None` when nothing parseable remains.
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    let cleaned = noise_re().replace_all(raw, "");
    cleaned.parse::<f64>().ok()
}

/// Composite cluster key: both coordinates rounded to `precision` decimal
/// places and joined with a comma, e.g. "51.51,-0.13".
pub fn cluster_key(lat: f64, lng: f64, precision: u32) -> String {
    let p = precision as usize;
    format!("{lat:.p$},{lng:.p$}")
}
