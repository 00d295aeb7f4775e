//! The fixed analysis battery: seven independent, read-only passes over the
//! deduplicated record collection. Each returns a typed result; records a
//! pass cannot coerce (bad dates, garbage coordinates) are excluded from
//! that pass only and counted, never deleted.
//!
//! Every averaging operation guards the empty sample explicitly — a run
//! over zero records fails with a reported condition instead of producing
//! NaN.

use crate::config::PipelineOptions;
use crate::geo::{cluster_key, parse_coordinate};
use crate::mapreduce::{count_keys, count_keys_parallel, top_k};
use crate::record::{parse_timestamp, Record};
use crate::store::Store;
use crate::text::{count_hashtags, ngrams, tokenize};
use anyhow::{bail, Result};
use serde::Serialize;
use std::fmt;

// ---------------- Unique posters ----------------

/// Full ranked list of (author_id, post_count), most prolific first.
#[derive(Clone, Debug, Serialize)]
pub struct PosterRanking {
    pub ranked: Vec<(String, u64)>,
}

pub fn top_posters(store: &dyn Store) -> Result<PosterRanking> {
    let records = store.snapshot()?;
    let counts = count_keys(&records, |r: &Record| [r.author_id.clone()]);
    let ranked = top_k(counts, usize::MAX);
    Ok(PosterRanking { ranked })
}

impl fmt::Display for PosterRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "unique posters: {}", self.ranked.len())?;
        for (author, count) in self.ranked.iter().take(10) {
            writeln!(f, "  {:>8}  {}", count, author)?;
        }
        Ok(())
    }
}

// ---------------- Top-10 concentration ----------------

#[derive(Clone, Copy, Debug, Serialize)]
pub struct TopConcentration {
    pub posts_by_top10: u64,
    pub total: u64,
    pub percent: f64,
}

pub fn top10_concentration(ranking: &PosterRanking, total: u64) -> Result<TopConcentration> {
    if total == 0 {
        bail!("concentration over an empty store");
    }
    let posts_by_top10: u64 = ranking.ranked.iter().take(10).map(|(_, c)| c).sum();
    let percent = posts_by_top10 as f64 / total as f64 * 100.0;
    Ok(TopConcentration { posts_by_top10, total, percent })
}

impl fmt::Display for TopConcentration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "top-10 posters wrote {} of {} posts ({:.1}%)",
            self.posts_by_top10, self.total, self.percent
        )
    }
}

// ---------------- Time span ----------------

/// Earliest and latest post, reported as the original timestamp strings.
#[derive(Clone, Debug, Serialize)]
pub struct TimeSpan {
    pub earliest: String,
    pub latest: String,
    pub skipped: u64,
}

pub fn time_span(store: &dyn Store) -> Result<TimeSpan> {
    let records = store.snapshot()?;
    let mut skipped: u64 = 0;
    let mut bounds: Option<((time::PrimitiveDateTime, String), (time::PrimitiveDateTime, String))> =
        None;

    for rec in &records {
        let ts = match parse_timestamp(&rec.timestamp) {
            Ok(ts) => ts,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        bounds = Some(match bounds.take() {
            None => ((ts, rec.timestamp.clone()), (ts, rec.timestamp.clone())),
            Some((lo, hi)) => (
                if ts < lo.0 { (ts, rec.timestamp.clone()) } else { lo },
                if ts > hi.0 { (ts, rec.timestamp.clone()) } else { hi },
            ),
        });
    }

    match bounds {
        Some((lo, hi)) => Ok(TimeSpan { earliest: lo.1, latest: hi.1, skipped }),
        None => bail!("time span: no parseable timestamps ({} skipped)", skipped),
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "posts span {} .. {}", self.earliest, self.latest)?;
        if self.skipped > 0 {
            write!(f, " ({} unparseable excluded)", self.skipped)?;
        }
        Ok(())
    }
}

// ---------------- Mean inter-post interval ----------------

#[derive(Clone, Copy, Debug, Serialize)]
pub struct MeanInterval {
    pub seconds: f64,
    pub skipped: u64,
}

pub fn mean_interval(store: &dyn Store) -> Result<MeanInterval> {
    let records = store.snapshot()?;
    let mut skipped: u64 = 0;
    let mut times: Vec<time::PrimitiveDateTime> = Vec::with_capacity(records.len());
    for rec in &records {
        match parse_timestamp(&rec.timestamp) {
            Ok(ts) => times.push(ts),
            Err(_) => skipped += 1,
        }
    }
    if times.len() < 2 {
        bail!(
            "mean interval needs at least two parseable timestamps, got {} ({} skipped)",
            times.len(),
            skipped
        );
    }
    times.sort_unstable();

    let total_secs: i64 = times
        .windows(2)
        .map(|w| (w[1] - w[0]).whole_seconds())
        .sum();
    let seconds = total_secs as f64 / (times.len() - 1) as f64;
    Ok(MeanInterval { seconds, skipped })
}

impl fmt::Display for MeanInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mean interval between posts: {:.1}s", self.seconds)?;
        if self.skipped > 0 {
            write!(f, " ({} unparseable excluded)", self.skipped)?;
        }
        Ok(())
    }
}

// ---------------- Mean text length ----------------

#[derive(Clone, Copy, Debug, Serialize)]
pub struct MeanTextLength {
    pub chars: f64,
}

pub fn mean_text_length(store: &dyn Store) -> Result<MeanTextLength> {
    let records = store.snapshot()?;
    if records.is_empty() {
        bail!("mean text length over an empty store");
    }
    let total: u64 = records.iter().map(|r| r.text.chars().count() as u64).sum();
    Ok(MeanTextLength { chars: total as f64 / records.len() as f64 })
}

impl fmt::Display for MeanTextLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mean message length: {:.1} chars", self.chars)
    }
}

// ---------------- N-grams ----------------

#[derive(Clone, Debug, Serialize)]
pub struct NgramCounts {
    pub n: usize,
    pub ranked: Vec<(String, u64)>,
}

/// Top `top_n` n-grams by occurrence. Tokenizing is the hottest loop in the
/// battery, so the counting map is built shard-parallel.
pub fn top_ngrams(store: &dyn Store, n: usize, top_n: usize) -> Result<NgramCounts> {
    let records = store.snapshot()?;
    let counts = count_keys_parallel(&records, |r: &Record| ngrams(&tokenize(&r.text), n));
    Ok(NgramCounts { n, ranked: top_k(counts, top_n) })
}

impl fmt::Display for NgramCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.n {
            1 => "unigrams".to_string(),
            2 => "bigrams".to_string(),
            n => format!("{}-grams", n),
        };
        writeln!(f, "top {}:", label)?;
        for (gram, count) in &self.ranked {
            writeln!(f, "  {:>8}  {}", count, gram)?;
        }
        Ok(())
    }
}

// ---------------- Hashtag density ----------------

#[derive(Clone, Copy, Debug, Serialize)]
pub struct HashtagDensity {
    pub per_post: f64,
}

pub fn hashtag_density(store: &dyn Store) -> Result<HashtagDensity> {
    let records = store.snapshot()?;
    if records.is_empty() {
        bail!("hashtag density over an empty store");
    }
    let total: u64 = records.iter().map(|r| count_hashtags(&r.text)).sum();
    Ok(HashtagDensity { per_post: total as f64 / records.len() as f64 })
}

impl fmt::Display for HashtagDensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hashtags per post: {:.1}", self.per_post)
    }
}

// ---------------- Geo clustering ----------------

#[derive(Clone, Debug, Serialize)]
pub struct GeoClusters {
    pub precision: u32,
    pub ranked: Vec<(String, u64)>,
    pub skipped: u64,
}

pub fn geo_clusters(store: &dyn Store, opts: &PipelineOptions) -> Result<GeoClusters> {
    let records = store.snapshot()?;
    let precision = opts.geo_precision;

    let mut skipped: u64 = 0;
    let mut keys: Vec<String> = Vec::with_capacity(records.len());
    for rec in &records {
        match (parse_coordinate(&rec.geo_lat), parse_coordinate(&rec.geo_lng)) {
            (Some(lat), Some(lng)) => keys.push(cluster_key(lat, lng, precision)),
            _ => skipped += 1,
        }
    }

    let counts = count_keys(&keys, |k: &String| [k.clone()]);
    Ok(GeoClusters { precision, ranked: top_k(counts, opts.top_n), skipped })
}

impl fmt::Display for GeoClusters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "top locations (precision {}):", self.precision)?;
        for (key, count) in &self.ranked {
            writeln!(f, "  {:>8}  {}", count, key)?;
        }
        if self.skipped > 0 {
            writeln!(f, "  ({} records without usable coordinates)", self.skipped)?;
        }
        Ok(())
    }
}
