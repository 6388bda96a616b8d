//! Review records at each pipeline stage.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::bank::Bank;

/// The constant `source` column value for every collected review.
pub const REVIEW_SOURCE: &str = "Google Play Store";

/// A review exactly as returned by the review-source API.
///
/// Immutable once fetched; all fields except the identifiers may be
/// missing or blank and are vetted by the cleaner.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReview {
    /// Store-assigned unique review identifier.
    #[serde(rename = "reviewId")]
    pub review_id: String,
    /// Free-text review body.
    #[serde(default)]
    pub content: Option<String>,
    /// Star rating, expected in 1..=5.
    #[serde(default)]
    pub score: Option<i64>,
    /// Submission timestamp, e.g. `2023-10-24T10:00:00`.
    #[serde(default)]
    pub at: Option<String>,
    /// Application identifier the review was fetched for.
    #[serde(rename = "appId", default)]
    pub app_id: String,
}

/// A review that passed every cleaning predicate.
///
/// Invariants: `review` is non-blank after trimming, `rating` is in
/// 1..=5, `date` is `YYYY-MM-DD`, and no two cleaned rows share the
/// same original review id.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedReview {
    pub review: String,
    pub rating: u8,
    pub date: String,
    pub bank: Bank,
    pub source: &'static str,
}

/// Sentiment classification outcome for a single review.
///
/// `Neutral` is the sentinel for rows the classifier could not score
/// (empty text, model failure, or no lexical signal either way).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Wire/DB representation, matching the upstream classifier labels.
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known sentiment label.
#[derive(Debug, Clone, Error)]
#[error("unknown sentiment label: {0:?}")]
pub struct ParseSentimentError(pub String);

impl FromStr for SentimentLabel {
    type Err = ParseSentimentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Ok(SentimentLabel::Positive),
            "NEGATIVE" => Ok(SentimentLabel::Negative),
            "NEUTRAL" => Ok(SentimentLabel::Neutral),
            other => Err(ParseSentimentError(other.to_string())),
        }
    }
}

/// A cleaned review plus sentiment and theme annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedReview {
    pub review: CleanedReview,
    pub sentiment_label: SentimentLabel,
    /// Signed score in [-1, 1]; sign matches the label, 0.0 for neutral.
    pub sentiment_score: f64,
    /// Zero or more theme tags; labels are independent booleans.
    pub themes: BTreeSet<String>,
}

impl EnrichedReview {
    /// Serialize the theme set the way the `reviews.themes` column and
    /// the enriched CSV store it.
    pub fn themes_joined(&self) -> String {
        self.themes
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parse a comma-joined theme list back into a set.
    pub fn split_themes(value: &str) -> BTreeSet<String> {
        value
            .split(',')
            .map(str::trim)
            .filter(|theme| !theme.is_empty())
            .map(String::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_review_deserializes_upstream_field_names() {
        let raw: RawReview = serde_json::from_str(
            r#"{"reviewId":"gp:1","content":"Good app","score":5,
                "at":"2023-10-26T09:30:00","appId":"com.combanketh.mobilebanking"}"#,
        )
        .unwrap();
        assert_eq!(raw.review_id, "gp:1");
        assert_eq!(raw.content.as_deref(), Some("Good app"));
        assert_eq!(raw.score, Some(5));
    }

    #[test]
    fn raw_review_tolerates_missing_fields() {
        let raw: RawReview = serde_json::from_str(r#"{"reviewId":"gp:2"}"#).unwrap();
        assert!(raw.content.is_none());
        assert!(raw.score.is_none());
        assert!(raw.at.is_none());
    }

    #[test]
    fn sentiment_label_round_trips_through_strings() {
        for label in [
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Neutral,
        ] {
            assert_eq!(label.as_str().parse::<SentimentLabel>().unwrap(), label);
        }
        assert!("MIXED".parse::<SentimentLabel>().is_err());
    }

    #[test]
    fn themes_join_and_split_round_trip() {
        let enriched = EnrichedReview {
            review: CleanedReview {
                review: "slow transfer".to_string(),
                rating: 2,
                date: "2024-01-01".to_string(),
                bank: Bank::Boa,
                source: REVIEW_SOURCE,
            },
            sentiment_label: SentimentLabel::Negative,
            sentiment_score: -0.8,
            themes: ["Transaction Performance", "Reliability & Bugs"]
                .into_iter()
                .map(String::from)
                .collect(),
        };
        let joined = enriched.themes_joined();
        assert_eq!(joined, "Reliability & Bugs, Transaction Performance");
        assert_eq!(EnrichedReview::split_themes(&joined), enriched.themes);
        assert!(EnrichedReview::split_themes("").is_empty());
    }
}
