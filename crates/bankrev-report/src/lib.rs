//! Reporting stage: aggregate statistics and chart images.
//!
//! Everything here is a pure function of the final enriched table; no
//! state is carried between runs.

mod aggregate;
mod charts;

pub use aggregate::{
    SentimentBreakdown, mean_sentiment_by_rating, negative_keywords_by_bank, sentiment_by_bank,
    theme_frequency, theme_frequency_by_bank,
};
pub use charts::{ChartSet, render_charts};
