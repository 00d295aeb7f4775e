mod config;
mod record;
mod parser;
mod store;
mod dedupe;

mod mapreduce;
mod text;
mod geo;
mod analyses;

mod progress;
mod util;
mod mem;
mod pipeline;

pub use crate::config::PipelineOptions;
pub use crate::record::{parse_timestamp, Record};
pub use crate::parser::{parse_file, ParseOutcome};
pub use crate::pipeline::{AnalysisReport, RunSummary, TweetETL};

pub use crate::store::{JsonlStore, MemStore, Store};
pub use crate::dedupe::{dedupe, DedupeReport};

pub use crate::analyses::{
    geo_clusters, hashtag_density, mean_interval, mean_text_length, time_span,
    top10_concentration, top_ngrams, top_posters, GeoClusters, HashtagDensity, MeanInterval,
    MeanTextLength, NgramCounts, PosterRanking, TimeSpan, TopConcentration,
};

// Expose grouping helpers so downstream code can run ad-hoc counts.
pub use crate::mapreduce::{count_keys, count_keys_parallel, top_k};

// Expose progress helpers for binaries that want their own bars.
pub use crate::progress::ProgressScope;

// Memory helper used before the full-file load.
pub use crate::mem::available_memory_fraction;
