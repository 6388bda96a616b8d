//! Shared data model for the bank review analytics pipeline.
//!
//! Types flow strictly forward through the stages:
//! `RawReview` (collector) → `CleanedReview` (cleaner) →
//! `EnrichedReview` (enricher) → relational rows (persister).

mod bank;
mod review;

pub use bank::{Bank, ParseBankError};
pub use review::{
    CleanedReview, EnrichedReview, ParseSentimentError, RawReview, REVIEW_SOURCE, SentimentLabel,
};
