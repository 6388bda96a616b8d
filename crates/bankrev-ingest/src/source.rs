//! The review-source boundary.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use bankrev_model::{Bank, RawReview};

/// Error raised while fetching one bank's review batch.
///
/// A source error never aborts the whole collection run; the collector
/// skips the failing bank and continues (see `collect_reviews`).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{0}")]
    Other(String),
}

/// A provider of raw review batches, keyed by bank.
///
/// Implementations wrap whatever actually talks to the store API; the
/// pipeline only ever sees the returned records.
pub trait ReviewSource {
    fn fetch(&self, bank: Bank) -> Result<Vec<RawReview>, SourceError>;
}

/// File-backed review source reading one JSON dump per application.
///
/// Expects `<dir>/<app_id>.json`, each file a JSON array of raw review
/// objects with the upstream field names (`reviewId`, `content`,
/// `score`, `at`).
#[derive(Debug, Clone)]
pub struct JsonBatchSource {
    dir: PathBuf,
}

impl JsonBatchSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn batch_path(&self, bank: Bank) -> PathBuf {
        self.dir.join(format!("{}.json", bank.app_id()))
    }
}

impl ReviewSource for JsonBatchSource {
    fn fetch(&self, bank: Bank) -> Result<Vec<RawReview>, SourceError> {
        let path = self.batch_path(bank);
        let contents = std::fs::read_to_string(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        let mut reviews: Vec<RawReview> =
            serde_json::from_str(&contents).map_err(|source| SourceError::Parse {
                path: path.clone(),
                source,
            })?;
        // Dumps predate bank resolution; stamp the app id so downstream
        // records stay traceable to their application.
        for review in &mut reviews {
            if review.app_id.is_empty() {
                review.app_id = bank.app_id().to_string();
            }
        }
        debug!(
            bank = %bank,
            path = %path.display(),
            record_count = reviews.len(),
            "batch loaded"
        );
        Ok(reviews)
    }
}

/// Convenience check used by the CLI to fail fast on a bad dump dir.
pub fn has_any_batch(dir: &Path) -> bool {
    Bank::ALL
        .into_iter()
        .any(|bank| dir.join(format!("{}.json", bank.app_id())).is_file())
}
