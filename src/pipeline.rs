use crate::analyses::{
    geo_clusters, hashtag_density, mean_interval, mean_text_length, time_span, top10_concentration,
    top_ngrams, top_posters, GeoClusters, HashtagDensity, MeanInterval, MeanTextLength,
    NgramCounts, PosterRanking, TimeSpan, TopConcentration,
};
use crate::config::PipelineOptions;
use crate::dedupe::{dedupe, DedupeReport};
use crate::mem::warn_if_tight;
use crate::parser::parse_file;
use crate::store::{JsonlStore, MemStore, Store};
use crate::util::init_tracing_once;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Pipeline entry point, builder-chained:
///
/// ```no_run
/// use tetl::TweetETL;
/// let summary = TweetETL::new()
///     .skip_header(true)
///     .progress(false)
///     .run("tweets.csv".as_ref())
///     .unwrap();
/// println!("{summary}");
/// ```
#[derive(Clone, Default)]
pub struct TweetETL {
    opts: PipelineOptions,
}

/// Every analysis result in one place, rebuilt from the record collection
/// on each invocation.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    pub posters: PosterRanking,
    pub concentration: TopConcentration,
    pub span: TimeSpan,
    pub interval: MeanInterval,
    pub text_length: MeanTextLength,
    pub unigrams: NgramCounts,
    pub bigrams: NgramCounts,
    pub hashtags: HashtagDensity,
    pub geo: GeoClusters,
}

/// What a full run produced, printable as the final human-readable summary.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub ingested: u64,
    pub rejected: u64,
    pub dedupe: DedupeReport,
    pub analyses: AnalysisReport,
}

impl TweetETL {
    pub fn new() -> Self {
        Self { opts: PipelineOptions::default() }
    }

    // -------- Builder methods --------
    pub fn delimiter(mut self, d: char) -> Self { self.opts = self.opts.with_delimiter(d); self }
    pub fn skip_header(mut self, yes: bool) -> Self { self.opts = self.opts.with_skip_header(yes); self }
    pub fn geo_precision(mut self, places: u32) -> Self { self.opts = self.opts.with_geo_precision(places); self }
    pub fn top_n(mut self, n: usize) -> Self { self.opts = self.opts.with_top_n(n); self }
    pub fn store_path(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_store_path(path); self }
    pub fn parallelism(mut self, threads: usize) -> Self { self.opts = self.opts.with_parallelism(threads); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }
    pub fn io_write_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_write_buffer(bytes); self }

    /// Full pipeline: parse -> ingest -> dedupe -> all analyses.
    pub fn run(self, input: &Path) -> Result<RunSummary> {
        init_tracing_once();
        if let Some(n) = self.opts.parallelism {
            if n > 0 { rayon::ThreadPoolBuilder::new().num_threads(n).build_global().ok(); }
        }
        warn_if_tight(input);

        let outcome = parse_file(input, &self.opts)
            .with_context(|| format!("parsing {}", input.display()))?;
        let ingested = outcome.accepted();
        let rejected = outcome.rejected;

        let store = self.open_store(false)?;
        store
            .insert_many(outcome.records)
            .context("bulk ingestion failed")?;
        tracing::info!(records = ingested, "ingested");

        let dd = dedupe(store.as_ref()).context("deduplication failed")?;
        let analyses = run_analyses(store.as_ref(), &self.opts)?;

        Ok(RunSummary { ingested, rejected, dedupe: dd, analyses })
    }

    /// Analysis-only mode: skip parse/ingest/dedupe and run the battery
    /// against a store persisted by a previous run.
    pub fn analyze(self) -> Result<AnalysisReport> {
        init_tracing_once();
        if let Some(n) = self.opts.parallelism {
            if n > 0 { rayon::ThreadPoolBuilder::new().num_threads(n).build_global().ok(); }
        }
        let store = self.open_store(true)?;
        run_analyses(store.as_ref(), &self.opts)
    }

    fn open_store(&self, reopen: bool) -> Result<Box<dyn Store>> {
        match &self.opts.store_path {
            None if reopen => Err(anyhow!("analysis-only mode needs a store_path")),
            None => Ok(Box::new(MemStore::new())),
            Some(path) if reopen => Ok(Box::new(JsonlStore::open(
                path,
                self.opts.read_buffer_bytes,
                self.opts.write_buffer_bytes,
            )?)),
            Some(path) => Ok(Box::new(JsonlStore::create(path, self.opts.write_buffer_bytes)?)),
        }
    }
}

/// The seven analyses in a fixed order. None reads another's output except
/// the concentration figure, which reuses the poster ranking.
fn run_analyses(store: &dyn Store, opts: &PipelineOptions) -> Result<AnalysisReport> {
    let total = store.count()? as u64;

    let posters = top_posters(store).context("unique-posters analysis")?;
    let concentration =
        top10_concentration(&posters, total).context("top-10 concentration analysis")?;
    let span = time_span(store).context("time-span analysis")?;
    let interval = mean_interval(store).context("mean-interval analysis")?;
    let text_length = mean_text_length(store).context("mean-text-length analysis")?;
    let unigrams = top_ngrams(store, 1, opts.top_n).context("unigram analysis")?;
    let bigrams = top_ngrams(store, 2, opts.top_n).context("bigram analysis")?;
    let hashtags = hashtag_density(store).context("hashtag-density analysis")?;
    let geo = geo_clusters(store, opts).context("geo-clustering analysis")?;

    Ok(AnalysisReport {
        posters,
        concentration,
        span,
        interval,
        text_length,
        unigrams,
        bigrams,
        hashtags,
        geo,
    })
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.posters)?;
        writeln!(f, "{}", self.concentration)?;
        writeln!(f, "{}", self.span)?;
        writeln!(f, "{}", self.interval)?;
        writeln!(f, "{}", self.text_length)?;
        write!(f, "{}", self.unigrams)?;
        write!(f, "{}", self.bigrams)?;
        writeln!(f, "{}", self.hashtags)?;
        write!(f, "{}", self.geo)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ingested {} records ({} rows rejected)", self.ingested, self.rejected)?;
        writeln!(
            f,
            "duplicates: {} groups, {} records removed",
            self.dedupe.duplicate_groups, self.dedupe.removed
        )?;
        write!(f, "{}", self.analyses)
    }
}
