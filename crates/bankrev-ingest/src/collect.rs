//! Per-bank collection loop.

use tracing::{info, warn};

use bankrev_model::{Bank, RawReview};

use crate::source::{ReviewSource, SourceError};

/// Collection targets.
///
/// The defaults match the original campaign: aim slightly above the
/// minimum per bank so the cleaner still leaves enough rows.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Maximum reviews kept per bank batch.
    pub target_count_per_bank: usize,
    /// Total row count below which the run is flagged as short.
    pub min_required_total: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            target_count_per_bank: 500,
            min_required_total: 1200,
        }
    }
}

/// Outcome of fetching one bank's batch.
#[derive(Debug)]
pub struct BankFetch {
    pub bank: Bank,
    pub fetched: usize,
    /// Present when the fetch failed; the bank contributed zero rows.
    pub error: Option<String>,
}

/// Outcome of the whole collection stage.
#[derive(Debug)]
pub struct CollectReport {
    pub fetches: Vec<BankFetch>,
    pub total_fetched: usize,
    /// True when the surviving total is under `min_required_total`.
    pub below_minimum: bool,
}

impl CollectReport {
    pub fn failed_banks(&self) -> impl Iterator<Item = &BankFetch> {
        self.fetches.iter().filter(|fetch| fetch.error.is_some())
    }
}

/// Fetch raw review batches for every bank.
///
/// A failing bank is skipped with a warning and recorded in the
/// report; the remaining banks are still collected (partial-result
/// policy). Each batch is truncated to the configured target count.
pub fn collect_reviews(
    source: &dyn ReviewSource,
    config: &CollectorConfig,
) -> (Vec<(Bank, Vec<RawReview>)>, CollectReport) {
    let mut batches = Vec::new();
    let mut fetches = Vec::new();
    let mut total_fetched = 0usize;

    for bank in Bank::ALL {
        match source.fetch(bank) {
            Ok(mut reviews) => {
                if reviews.len() > config.target_count_per_bank {
                    reviews.truncate(config.target_count_per_bank);
                }
                if reviews.is_empty() {
                    warn!(bank = %bank, "no reviews found; check app id, country, language");
                }
                info!(bank = %bank, record_count = reviews.len(), "batch collected");
                total_fetched += reviews.len();
                fetches.push(BankFetch {
                    bank,
                    fetched: reviews.len(),
                    error: None,
                });
                batches.push((bank, reviews));
            }
            Err(error) => {
                warn!(bank = %bank, %error, "fetch failed; skipping bank");
                fetches.push(BankFetch {
                    bank,
                    fetched: 0,
                    error: Some(error.to_string()),
                });
            }
        }
    }

    let below_minimum = total_fetched < config.min_required_total;
    if below_minimum {
        warn!(
            total_fetched,
            min_required = config.min_required_total,
            "collected fewer rows than the campaign minimum"
        );
    }

    let report = CollectReport {
        fetches,
        total_fetched,
        below_minimum,
    };
    (batches, report)
}

/// Test helper source: canned batches plus forced failures.
#[cfg(test)]
struct StubSource {
    fail: Vec<Bank>,
    per_bank: usize,
}

#[cfg(test)]
impl ReviewSource for StubSource {
    fn fetch(&self, bank: Bank) -> Result<Vec<RawReview>, SourceError> {
        if self.fail.contains(&bank) {
            return Err(SourceError::Other(format!("stub failure for {bank}")));
        }
        let reviews = (0..self.per_bank)
            .map(|idx| RawReview {
                review_id: format!("{bank}:{idx}"),
                content: Some(format!("review {idx}")),
                score: Some(4),
                at: Some("2024-03-01T12:00:00".to_string()),
                app_id: bank.app_id().to_string(),
            })
            .collect();
        Ok(reviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_all_banks() {
        let source = StubSource {
            fail: vec![],
            per_bank: 3,
        };
        let (batches, report) = collect_reviews(&source, &CollectorConfig::default());
        assert_eq!(batches.len(), 3);
        assert_eq!(report.total_fetched, 9);
        assert_eq!(report.failed_banks().count(), 0);
        assert!(report.below_minimum);
    }

    #[test]
    fn failing_bank_is_skipped_not_fatal() {
        let source = StubSource {
            fail: vec![Bank::Boa],
            per_bank: 2,
        };
        let (batches, report) = collect_reviews(&source, &CollectorConfig::default());
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|(bank, _)| *bank != Bank::Boa));
        let failed: Vec<Bank> = report.failed_banks().map(|fetch| fetch.bank).collect();
        assert_eq!(failed, vec![Bank::Boa]);
    }

    #[test]
    fn batches_are_capped_at_target_count() {
        let source = StubSource {
            fail: vec![],
            per_bank: 10,
        };
        let config = CollectorConfig {
            target_count_per_bank: 4,
            min_required_total: 1,
        };
        let (batches, report) = collect_reviews(&source, &config);
        assert!(batches.iter().all(|(_, reviews)| reviews.len() == 4));
        assert_eq!(report.total_fetched, 12);
        assert!(!report.below_minimum);
    }
}
