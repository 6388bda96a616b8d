//! Row-by-row enrichment loop.

use std::collections::BTreeSet;

use tracing::{info, warn};

use bankrev_model::{CleanedReview, EnrichedReview, SentimentLabel};

use crate::lemma::Lemmatizer;
use crate::sentiment::{SentimentModel, signed_score};
use crate::themes::ThemeRules;

/// Enrichment outcome and the sentiment-coverage KPI input.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnrichReport {
    /// Rows the classifier scored (any label, including a genuine tie).
    pub scored: usize,
    /// Rows that fell back to the neutral sentinel on model failure or
    /// empty text; themes were skipped for these.
    pub fallback: usize,
}

impl EnrichReport {
    pub fn total(&self) -> usize {
        self.scored + self.fallback
    }

    /// Percentage of rows with a real classifier verdict.
    pub fn coverage_percent(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.scored as f64 / self.total() as f64 * 100.0
        }
    }
}

/// Enrich every cleaned review with sentiment and themes.
///
/// A classifier failure or empty text marks that row with the neutral
/// sentinel (score 0.0, no themes) and the run continues; there is no
/// per-row retry.
pub fn enrich_reviews(
    reviews: &[CleanedReview],
    model: &dyn SentimentModel,
    lemmatizer: &dyn Lemmatizer,
    rules: &ThemeRules,
) -> (Vec<EnrichedReview>, EnrichReport) {
    let mut enriched = Vec::with_capacity(reviews.len());
    let mut report = EnrichReport::default();

    for review in reviews {
        let text = review.review.trim();
        if text.is_empty() {
            report.fallback += 1;
            enriched.push(neutral_row(review));
            continue;
        }
        match model.predict(text) {
            Ok(prediction) => {
                let lemmas = lemmatizer.lemmatize(text);
                let themes = rules.assign(&lemmas);
                report.scored += 1;
                enriched.push(EnrichedReview {
                    review: review.clone(),
                    sentiment_label: prediction.label,
                    sentiment_score: signed_score(prediction),
                    themes,
                });
            }
            Err(error) => {
                warn!(bank = %review.bank, date = %review.date, %error, "row fell back to neutral");
                report.fallback += 1;
                enriched.push(neutral_row(review));
            }
        }
    }

    info!(
        record_count = report.total(),
        scored = report.scored,
        fallback = report.fallback,
        coverage_percent = format!("{:.2}", report.coverage_percent()),
        "enrichment complete"
    );
    (enriched, report)
}

fn neutral_row(review: &CleanedReview) -> EnrichedReview {
    EnrichedReview {
        review: review.clone(),
        sentiment_label: SentimentLabel::Neutral,
        sentiment_score: 0.0,
        themes: BTreeSet::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lemma::RuleLemmatizer;
    use crate::sentiment::{EnrichError, LexiconModel, Prediction};
    use bankrev_model::{Bank, REVIEW_SOURCE};

    fn cleaned(text: &str, rating: u8, bank: Bank) -> CleanedReview {
        CleanedReview {
            review: text.to_string(),
            rating,
            date: "2023-10-24".to_string(),
            bank,
            source: REVIEW_SOURCE,
        }
    }

    struct FailingModel;

    impl SentimentModel for FailingModel {
        fn predict(&self, _text: &str) -> Result<Prediction, EnrichError> {
            Err(EnrichError::Model("stub outage".to_string()))
        }
    }

    #[test]
    fn crash_on_login_gets_negative_label_and_both_themes() {
        let rows = vec![cleaned("App crashes on login", 1, Bank::Cbe)];
        let (enriched, report) = enrich_reviews(
            &rows,
            &LexiconModel::default(),
            &RuleLemmatizer,
            &ThemeRules::default_rules(),
        );
        assert_eq!(report.scored, 1);
        let row = &enriched[0];
        assert_eq!(row.sentiment_label, SentimentLabel::Negative);
        assert!(row.sentiment_score < 0.0 && row.sentiment_score >= -1.0);
        assert!(row.themes.contains("Reliability & Bugs"));
        assert!(row.themes.contains("Account & Login Issues"));
    }

    #[test]
    fn model_failure_yields_neutral_sentinel_and_no_themes() {
        let rows = vec![
            cleaned("App crashes on login", 1, Bank::Cbe),
            cleaned("Great and easy to use", 5, Bank::Boa),
        ];
        let (enriched, report) = enrich_reviews(
            &rows,
            &FailingModel,
            &RuleLemmatizer,
            &ThemeRules::default_rules(),
        );
        assert_eq!(report.fallback, 2);
        assert_eq!(report.coverage_percent(), 0.0);
        for row in &enriched {
            assert_eq!(row.sentiment_label, SentimentLabel::Neutral);
            assert_eq!(row.sentiment_score, 0.0);
            assert!(row.themes.is_empty());
        }
    }

    #[test]
    fn coverage_percent_reflects_scored_share() {
        let report = EnrichReport {
            scored: 9,
            fallback: 1,
        };
        assert!((report.coverage_percent() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn sign_always_matches_label() {
        let rows = vec![
            cleaned("Great fast easy app, love it", 5, Bank::Dashen),
            cleaned("Terrible crash error slow", 1, Bank::Cbe),
            cleaned("I opened it yesterday", 3, Bank::Boa),
        ];
        let (enriched, _) = enrich_reviews(
            &rows,
            &LexiconModel::default(),
            &RuleLemmatizer,
            &ThemeRules::default_rules(),
        );
        for row in &enriched {
            assert!((-1.0..=1.0).contains(&row.sentiment_score));
            match row.sentiment_label {
                SentimentLabel::Positive => assert!(row.sentiment_score > 0.0),
                SentimentLabel::Negative => assert!(row.sentiment_score < 0.0),
                SentimentLabel::Neutral => assert_eq!(row.sentiment_score, 0.0),
            }
        }
    }
}
