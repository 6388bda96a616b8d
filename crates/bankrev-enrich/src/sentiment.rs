//! The sentiment classifier boundary and the default lexicon model.

use std::collections::HashSet;
use std::sync::LazyLock;

use thiserror::Error;

use bankrev_model::SentimentLabel;

use crate::lemma::{Lemmatizer, RuleLemmatizer};

/// Error raised while scoring one review.
///
/// Enrichment errors are recovered per row: the failing review gets
/// the neutral sentinel and an empty theme set, and the run continues.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("sentiment model failure: {0}")]
    Model(String),
}

/// Classifier output: a label plus confidence in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: SentimentLabel,
    pub confidence: f64,
}

/// A pretrained sentiment classifier, injected as a capability so the
/// enricher is testable with a stub.
pub trait SentimentModel {
    fn predict(&self, text: &str) -> Result<Prediction, EnrichError>;
}

/// Fold a prediction into the signed score stored downstream:
/// the confidence when positive, its negation when negative, zero for
/// the neutral sentinel. Always within [-1, 1].
pub fn signed_score(prediction: Prediction) -> f64 {
    let confidence = prediction.confidence.clamp(0.0, 1.0);
    match prediction.label {
        SentimentLabel::Positive => confidence,
        SentimentLabel::Negative => -confidence,
        SentimentLabel::Neutral => 0.0,
    }
}

/// Default classifier: positive/negative lexicon hit counting over the
/// review's lemmas.
///
/// Confidence is the margin between the dominant and the opposing hit
/// count over total hits, so a review with only negative triggers
/// scores 1.0 while a mixed review scores near the middle. Text with
/// no lexical signal either way maps to the neutral sentinel.
#[derive(Debug, Default)]
pub struct LexiconModel {
    lemmatizer: RuleLemmatizer,
}

static POSITIVE_LEXICON: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // Praise
        "good", "great", "nice", "excellent", "amazing", "awesome", "wonderful", "fantastic",
        "perfect", "love", "like", "best", "super", "cool", "impressive", "beautiful",
        // Usability
        "easy", "simple", "fast", "quick", "smooth", "convenient", "friendly", "intuitive",
        "clean", "modern", "helpful", "useful", "reliable", "secure", "stable",
        // Outcomes
        "improve", "improvement", "thank", "recommend", "satisfied", "happy", "enjoy",
    ]
    .into_iter()
    .collect()
});

static NEGATIVE_LEXICON: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // Failures
        "crash", "bug", "glitch", "error", "fail", "failure", "freeze", "stuck", "broken",
        "problem", "issue", "wrong", "lose", "lost",
        // Frustration
        "bad", "poor", "terrible", "horrible", "awful", "worthless", "useless", "annoying",
        "frustrating", "disappointing", "disappointed", "hate", "waste", "nonsense",
        // Performance
        "slow", "slowly", "lag", "laggy", "hang", "delay", "pending", "unresponsive",
        // Access
        "block", "lock", "reject", "deny", "denied", "unable", "cannot", "cant", "never",
    ]
    .into_iter()
    .collect()
});

impl SentimentModel for LexiconModel {
    fn predict(&self, text: &str) -> Result<Prediction, EnrichError> {
        let lemmas = self.lemmatizer.lemmatize(text);
        let mut positive = 0usize;
        let mut negative = 0usize;
        for lemma in &lemmas {
            if POSITIVE_LEXICON.contains(lemma.as_str()) {
                positive += 1;
            }
            if NEGATIVE_LEXICON.contains(lemma.as_str()) {
                negative += 1;
            }
        }

        let total = positive + negative;
        if total == 0 || positive == negative {
            // No signal, or an exact tie: the neutral sentinel.
            return Ok(Prediction {
                label: SentimentLabel::Neutral,
                confidence: 0.0,
            });
        }

        let (label, dominant, opposing) = if positive > negative {
            (SentimentLabel::Positive, positive, negative)
        } else {
            (SentimentLabel::Negative, negative, positive)
        };
        let confidence = (dominant - opposing) as f64 / total as f64;
        Ok(Prediction { label, confidence })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearly_positive_text_scores_positive() {
        let model = LexiconModel::default();
        let prediction = model
            .predict("Great app, fast and easy to use. Love it!")
            .unwrap();
        assert_eq!(prediction.label, SentimentLabel::Positive);
        assert!(prediction.confidence > 0.0 && prediction.confidence <= 1.0);
        assert!(signed_score(prediction) > 0.0);
    }

    #[test]
    fn clearly_negative_text_scores_negative() {
        let model = LexiconModel::default();
        let prediction = model.predict("App crashes on login").unwrap();
        assert_eq!(prediction.label, SentimentLabel::Negative);
        assert!(signed_score(prediction) < 0.0);
    }

    #[test]
    fn empty_text_maps_to_neutral_zero() {
        let model = LexiconModel::default();
        let prediction = model.predict("").unwrap();
        assert_eq!(prediction.label, SentimentLabel::Neutral);
        assert_eq!(signed_score(prediction), 0.0);
    }

    #[test]
    fn balanced_text_is_a_tie_and_stays_neutral() {
        let model = LexiconModel::default();
        let prediction = model.predict("good app but crashes").unwrap();
        assert_eq!(prediction.label, SentimentLabel::Neutral);
        assert_eq!(prediction.confidence, 0.0);
    }

    #[test]
    fn mixed_text_has_reduced_confidence() {
        let model = LexiconModel::default();
        let pure = model.predict("slow crash error").unwrap();
        let mixed = model.predict("nice design but slow crash error").unwrap();
        assert_eq!(pure.label, SentimentLabel::Negative);
        assert_eq!(mixed.label, SentimentLabel::Negative);
        assert!(mixed.confidence < pure.confidence);
    }

    #[test]
    fn signed_score_clamps_out_of_range_confidence() {
        let prediction = Prediction {
            label: SentimentLabel::Positive,
            confidence: 1.5,
        };
        assert_eq!(signed_score(prediction), 1.0);
    }
}
