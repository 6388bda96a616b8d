//! Property tests for the enrichment invariants.

use proptest::prelude::{ProptestConfig, proptest};

use bankrev_enrich::{Lemmatizer, LexiconModel, RuleLemmatizer, SentimentModel, ThemeRules, signed_score};
use bankrev_model::SentimentLabel;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn score_is_bounded_and_sign_matches_label(text in ".{0,200}") {
        let model = LexiconModel::default();
        let prediction = model.predict(&text).unwrap();
        let score = signed_score(prediction);
        assert!((-1.0..=1.0).contains(&score));
        match prediction.label {
            SentimentLabel::Positive => assert!(score > 0.0),
            SentimentLabel::Negative => assert!(score < 0.0),
            SentimentLabel::Neutral => assert_eq!(score, 0.0),
        }
    }

    #[test]
    fn theme_assignment_is_idempotent(text in ".{0,200}") {
        let lemmatizer = RuleLemmatizer;
        let rules = ThemeRules::default_rules();
        let lemmas = lemmatizer.lemmatize(&text);
        let first = rules.assign(&lemmas);
        let second = rules.assign(&lemmas);
        assert_eq!(first, second);
    }

    #[test]
    fn lemmatization_is_deterministic(text in ".{0,200}") {
        let lemmatizer = RuleLemmatizer;
        assert_eq!(lemmatizer.lemmatize(&text), lemmatizer.lemmatize(&text));
    }
}
