//! The four run-once pipeline stages behind the CLI commands.
//!
//! 1. **Collect**: fetch raw batches per bank, clean, write the
//!    cleaned CSV checkpoint
//! 2. **Enrich**: read the cleaned CSV, score sentiment and assign
//!    themes, write the enriched CSV checkpoint
//! 3. **Load**: read the enriched CSV, upsert banks and insert review
//!    rows into the relational store
//! 4. **Report**: read the enriched CSV, compute aggregates and render
//!    chart images
//!
//! Each stage takes the previous stage's artifact and returns typed
//! results; quality-level failures are recovered inside the stage,
//! persistence failures abort.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use bankrev_clean::{CleanReport, clean_reviews};
use bankrev_enrich::{
    EnrichReport, LexiconModel, RuleLemmatizer, ThemeRules, enrich_reviews,
};
use bankrev_ingest::{
    CollectReport, CollectorConfig, JsonBatchSource, has_any_batch, read_cleaned_csv,
    read_enriched_csv, write_cleaned_csv, write_enriched_csv,
};
use bankrev_model::{Bank, EnrichedReview};
use bankrev_report::{
    ChartSet, SentimentBreakdown, mean_sentiment_by_rating, render_charts, sentiment_by_bank,
    theme_frequency, theme_frequency_by_bank,
};
use bankrev_store::{PersistReport, ReviewStore, StoreConfig};

/// Result of the collect stage.
#[derive(Debug)]
pub struct CollectOutcome {
    pub collect: CollectReport,
    pub clean: CleanReport,
    /// Cleaned rows kept per bank, for the summary table.
    pub kept_by_bank: BTreeMap<Bank, usize>,
}

/// Fetch every bank's batch from the dump directory, clean the
/// concatenated rows, and write the cleaned checkpoint.
pub fn run_collect_stage(
    input_dir: &Path,
    output: &Path,
    config: &CollectorConfig,
) -> Result<CollectOutcome> {
    let span = info_span!("collect", input_dir = %input_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    if !has_any_batch(input_dir) {
        bail!(
            "no review dumps found in {} (expected <app_id>.json files)",
            input_dir.display()
        );
    }

    let source = JsonBatchSource::new(input_dir);
    let (batches, collect) = bankrev_ingest::collect_reviews(&source, config);
    let (cleaned, clean) = clean_reviews(&batches);

    let mut kept_by_bank: BTreeMap<Bank, usize> = BTreeMap::new();
    for row in &cleaned {
        *kept_by_bank.entry(row.bank).or_insert(0) += 1;
    }

    write_cleaned_csv(output, &cleaned)
        .with_context(|| format!("write {}", output.display()))?;
    info!(
        record_count = cleaned.len(),
        duration_ms = start.elapsed().as_millis(),
        "collect stage complete"
    );
    Ok(CollectOutcome {
        collect,
        clean,
        kept_by_bank,
    })
}

/// Result of the enrich stage.
#[derive(Debug)]
pub struct EnrichOutcome {
    pub report: EnrichReport,
    pub sentiment: BTreeMap<Bank, SentimentBreakdown>,
    pub by_rating: BTreeMap<(Bank, u8), f64>,
    pub themes: BTreeMap<String, usize>,
    pub themes_by_bank: BTreeMap<Bank, BTreeMap<String, usize>>,
}

/// Read the cleaned checkpoint, enrich every row, and write the
/// enriched checkpoint.
pub fn run_enrich_stage(input: &Path, output: &Path) -> Result<EnrichOutcome> {
    let span = info_span!("enrich", input = %input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let cleaned = read_cleaned_csv(input).with_context(|| format!("read {}", input.display()))?;
    let model = LexiconModel::default();
    let lemmatizer = RuleLemmatizer;
    let rules = ThemeRules::default_rules();
    let (enriched, report) = enrich_reviews(&cleaned, &model, &lemmatizer, &rules);

    write_enriched_csv(output, &enriched)
        .with_context(|| format!("write {}", output.display()))?;
    info!(
        record_count = enriched.len(),
        duration_ms = start.elapsed().as_millis(),
        "enrich stage complete"
    );
    Ok(EnrichOutcome {
        report,
        sentiment: sentiment_by_bank(&enriched),
        by_rating: mean_sentiment_by_rating(&enriched),
        themes: theme_frequency(&enriched),
        themes_by_bank: theme_frequency_by_bank(&enriched),
    })
}

/// Read the enriched checkpoint and persist it. Fatal on any store
/// error; optionally truncates the reviews table first.
pub fn run_load_stage(input: &Path, db_path: &Path, reset: bool) -> Result<PersistReport> {
    let span = info_span!("load", db_path = %db_path.display());
    let _guard = span.enter();
    let start = Instant::now();

    let enriched = read_enriched_csv(input).with_context(|| format!("read {}", input.display()))?;
    let config = StoreConfig::new(db_path);
    let mut store = ReviewStore::open(&config)
        .with_context(|| format!("open {}", db_path.display()))?;
    if reset {
        store.clear_reviews().context("clear reviews")?;
    }
    let report = store
        .persist_reviews(&enriched)
        .context("persist reviews")?;
    info!(
        record_count = report.reviews,
        duration_ms = start.elapsed().as_millis(),
        "load stage complete"
    );
    Ok(report)
}

/// Result of the report stage.
#[derive(Debug)]
pub struct ReportOutcome {
    pub charts: ChartSet,
    pub sentiment: BTreeMap<Bank, SentimentBreakdown>,
    pub by_rating: BTreeMap<(Bank, u8), f64>,
    pub themes: BTreeMap<String, usize>,
    pub themes_by_bank: BTreeMap<Bank, BTreeMap<String, usize>>,
    pub record_count: usize,
}

/// Read the enriched checkpoint, compute the aggregates, and render
/// the chart images.
pub fn run_report_stage(input: &Path, out_dir: &Path) -> Result<ReportOutcome> {
    let span = info_span!("report", out_dir = %out_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let enriched: Vec<EnrichedReview> =
        read_enriched_csv(input).with_context(|| format!("read {}", input.display()))?;
    let charts = render_charts(&enriched, &RuleLemmatizer, out_dir).context("render charts")?;
    info!(
        record_count = enriched.len(),
        duration_ms = start.elapsed().as_millis(),
        "report stage complete"
    );
    Ok(ReportOutcome {
        charts,
        sentiment: sentiment_by_bank(&enriched),
        by_rating: mean_sentiment_by_rating(&enriched),
        themes: theme_frequency(&enriched),
        themes_by_bank: theme_frequency_by_bank(&enriched),
        record_count: enriched.len(),
    })
}
