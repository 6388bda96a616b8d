//! Review enrichment stage.
//!
//! For each cleaned review this stage asks an injected sentiment model
//! for a label plus confidence, folds them into a signed score in
//! [-1, 1], and assigns zero or more theme tags by intersecting the
//! review's lemmas with a fixed trigger table. The classifier and the
//! lemmatizer are capabilities passed in at the seam, so the stage is
//! testable with stubs.

mod enrich;
mod lemma;
mod sentiment;
mod themes;

pub use enrich::{EnrichReport, enrich_reviews};
pub use lemma::{Lemmatizer, RuleLemmatizer};
pub use sentiment::{EnrichError, LexiconModel, Prediction, SentimentModel, signed_score};
pub use themes::ThemeRules;
