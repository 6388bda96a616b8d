//! Review collection and checkpoint I/O.
//!
//! The scraping client itself is a black box behind the
//! [`ReviewSource`] trait; this crate provides the file-backed
//! [`JsonBatchSource`] for dumps produced by an external scraper, the
//! per-bank collection loop with its partial-result policy, and the
//! CSV checkpoint artifacts exchanged between the run-once commands.

mod checkpoint;
mod collect;
mod source;

pub use checkpoint::{
    CheckpointError, read_cleaned_csv, read_enriched_csv, write_cleaned_csv, write_enriched_csv,
};
pub use collect::{BankFetch, CollectReport, CollectorConfig, collect_reviews};
pub use source::{JsonBatchSource, ReviewSource, SourceError, has_any_batch};
