//! Descriptive statistics over the enriched table.

use std::collections::BTreeMap;

use bankrev_enrich::Lemmatizer;
use bankrev_model::{Bank, EnrichedReview, SentimentLabel};

/// Per-bank sentiment counts and the mean signed score.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub mean_score: f64,
}

impl SentimentBreakdown {
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

/// Sentiment distribution per bank.
pub fn sentiment_by_bank(reviews: &[EnrichedReview]) -> BTreeMap<Bank, SentimentBreakdown> {
    let mut by_bank: BTreeMap<Bank, (SentimentBreakdown, f64)> = BTreeMap::new();
    for enriched in reviews {
        let entry = by_bank.entry(enriched.review.bank).or_default();
        match enriched.sentiment_label {
            SentimentLabel::Positive => entry.0.positive += 1,
            SentimentLabel::Negative => entry.0.negative += 1,
            SentimentLabel::Neutral => entry.0.neutral += 1,
        }
        entry.1 += enriched.sentiment_score;
    }
    by_bank
        .into_iter()
        .map(|(bank, (mut breakdown, score_sum))| {
            let total = breakdown.total();
            breakdown.mean_score = if total == 0 {
                0.0
            } else {
                score_sum / total as f64
            };
            (bank, breakdown)
        })
        .collect()
}

/// Mean signed score per (bank, rating) cell.
pub fn mean_sentiment_by_rating(reviews: &[EnrichedReview]) -> BTreeMap<(Bank, u8), f64> {
    let mut sums: BTreeMap<(Bank, u8), (f64, usize)> = BTreeMap::new();
    for enriched in reviews {
        let key = (enriched.review.bank, enriched.review.rating);
        let entry = sums.entry(key).or_default();
        entry.0 += enriched.sentiment_score;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect()
}

/// Overall theme frequency counts.
pub fn theme_frequency(reviews: &[EnrichedReview]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for enriched in reviews {
        for theme in &enriched.themes {
            *counts.entry(theme.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Theme frequency counts per bank.
pub fn theme_frequency_by_bank(
    reviews: &[EnrichedReview],
) -> BTreeMap<Bank, BTreeMap<String, usize>> {
    let mut counts: BTreeMap<Bank, BTreeMap<String, usize>> = BTreeMap::new();
    for enriched in reviews {
        let bank_counts = counts.entry(enriched.review.bank).or_default();
        for theme in &enriched.themes {
            *bank_counts.entry(theme.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Most frequent lemmas in each bank's negative reviews, descending by
/// count then alphabetically. The textual stand-in for the word-cloud
/// style pain-point view.
pub fn negative_keywords_by_bank(
    reviews: &[EnrichedReview],
    lemmatizer: &dyn Lemmatizer,
    top_n: usize,
) -> BTreeMap<Bank, Vec<(String, usize)>> {
    let mut counts: BTreeMap<Bank, BTreeMap<String, usize>> = BTreeMap::new();
    for enriched in reviews {
        if enriched.sentiment_label != SentimentLabel::Negative {
            continue;
        }
        let bank_counts = counts.entry(enriched.review.bank).or_default();
        for lemma in lemmatizer.lemmatize(&enriched.review.review) {
            *bank_counts.entry(lemma).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .map(|(bank, lemma_counts)| {
            let mut ranked: Vec<(String, usize)> = lemma_counts.into_iter().collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            ranked.truncate(top_n);
            (bank, ranked)
        })
        .collect()
}
