//! Review cleaning stage.
//!
//! Applies the quality predicates in a fixed order over the
//! concatenated raw batches, then projects survivors onto the
//! canonical cleaned table:
//!
//! 1. drop rows with blank `content`, missing `score`, or missing `at`
//! 2. drop rows whose rating falls outside 1..=5
//! 3. drop rows whose timestamp does not normalize to `YYYY-MM-DD`
//! 4. drop duplicate review ids (first occurrence wins, across banks)
//!
//! Survivors keep their pass-through order. Drops are never errors;
//! they aggregate into the drop-rate KPI reported once per run.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use bankrev_model::{Bank, CleanedReview, RawReview, REVIEW_SOURCE};

/// Why a raw row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    MissingContent,
    MissingScore,
    MissingDate,
    BadRating,
    BadDate,
    Duplicate,
}

/// Per-run cleaning outcome and KPI input.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanReport {
    pub fetched: usize,
    pub kept: usize,
    pub missing_content: usize,
    pub missing_score: usize,
    pub missing_date: usize,
    pub bad_rating: usize,
    pub bad_date: usize,
    pub duplicates: usize,
}

impl CleanReport {
    fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::MissingContent => self.missing_content += 1,
            DropReason::MissingScore => self.missing_score += 1,
            DropReason::MissingDate => self.missing_date += 1,
            DropReason::BadRating => self.bad_rating += 1,
            DropReason::BadDate => self.bad_date += 1,
            DropReason::Duplicate => self.duplicates += 1,
        }
    }

    /// Rows dropped by a quality predicate (everything but dedupe).
    pub fn quality_drops(&self) -> usize {
        self.missing_content + self.missing_score + self.missing_date + self.bad_rating + self.bad_date
    }

    pub fn total_drops(&self) -> usize {
        self.quality_drops() + self.duplicates
    }

    /// The run KPI: percentage of fetched rows dropped for missing or
    /// invalid critical fields. Duplicates are reported separately.
    pub fn drop_rate_percent(&self) -> f64 {
        if self.fetched == 0 {
            0.0
        } else {
            self.quality_drops() as f64 / self.fetched as f64 * 100.0
        }
    }
}

/// Clean the concatenated raw batches into the canonical review table.
///
/// An empty or missing bank batch simply contributes zero rows; the
/// stage never fails.
pub fn clean_reviews(batches: &[(Bank, Vec<RawReview>)]) -> (Vec<CleanedReview>, CleanReport) {
    let mut report = CleanReport::default();
    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut cleaned = Vec::new();

    for (bank, reviews) in batches {
        for raw in reviews {
            report.fetched += 1;
            match vet_row(raw, &mut seen_ids) {
                Ok((review, rating, date)) => {
                    cleaned.push(CleanedReview {
                        review,
                        rating,
                        date,
                        bank: *bank,
                        source: REVIEW_SOURCE,
                    });
                    report.kept += 1;
                }
                Err(reason) => {
                    debug!(bank = %bank, review_id = %raw.review_id, ?reason, "row dropped");
                    report.record(reason);
                }
            }
        }
    }

    info!(
        fetched = report.fetched,
        kept = report.kept,
        quality_drops = report.quality_drops(),
        duplicates = report.duplicates,
        drop_rate_percent = format!("{:.2}", report.drop_rate_percent()),
        "cleaning complete"
    );
    (cleaned, report)
}

fn vet_row<'a>(
    raw: &'a RawReview,
    seen_ids: &mut HashSet<&'a str>,
) -> Result<(String, u8, String), DropReason> {
    let content = raw
        .content
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or(DropReason::MissingContent)?;
    let score = raw.score.ok_or(DropReason::MissingScore)?;
    let at = raw.at.as_deref().ok_or(DropReason::MissingDate)?;

    let rating = u8::try_from(score).ok().filter(|value| (1..=5).contains(value));
    let rating = rating.ok_or(DropReason::BadRating)?;
    let date = normalize_date(at).ok_or(DropReason::BadDate)?;

    // Dedupe runs after the field checks so the KPI counts field
    // problems even on rows that would also have been duplicates.
    if !seen_ids.insert(raw.review_id.as_str()) {
        return Err(DropReason::Duplicate);
    }

    Ok((content.to_string(), rating, date))
}

/// Normalize a source timestamp to `YYYY-MM-DD`.
///
/// Accepts ISO timestamps with `T` or space separators, with or
/// without fractional seconds, or a bare date.
pub fn normalize_date(value: &str) -> Option<String> {
    let trimmed = value.trim();
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date().format("%Y-%m-%d").to_string());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, content: Option<&str>, score: Option<i64>, at: Option<&str>) -> RawReview {
        RawReview {
            review_id: id.to_string(),
            content: content.map(String::from),
            score,
            at: at.map(String::from),
            app_id: Bank::Cbe.app_id().to_string(),
        }
    }

    fn sample_batches() -> Vec<(Bank, Vec<RawReview>)> {
        vec![
            (
                Bank::Cbe,
                vec![
                    raw("gp:1", Some("This is a good app!"), Some(5), Some("2023-10-26T00:00:00")),
                    raw("gp:2", None, Some(1), Some("2023-10-25T00:00:00")),
                    raw("gp:5", Some("  Needs more features. "), Some(4), Some("2023-10-23T00:00:00")),
                ],
            ),
            (
                Bank::Dashen,
                vec![
                    raw("gp:3", Some("This is a duplicate."), Some(3), Some("2023-10-24T00:00:00")),
                    raw("gp:3", Some("This is a duplicate."), Some(3), Some("2023-10-24T00:00:00")),
                    raw("gp:6", Some(""), Some(2), Some("2023-10-22T00:00:00")),
                ],
            ),
        ]
    }

    #[test]
    fn removes_null_and_empty_content() {
        let (cleaned, report) = clean_reviews(&sample_batches());
        assert_eq!(cleaned.len(), 3);
        assert!(cleaned.iter().any(|row| row.review == "This is a good app!"));
        assert!(cleaned.iter().any(|row| row.review == "Needs more features."));
        assert_eq!(report.missing_content, 2);
    }

    #[test]
    fn removes_duplicate_review_ids() {
        let (cleaned, report) = clean_reviews(&sample_batches());
        let dupes = cleaned
            .iter()
            .filter(|row| row.review == "This is a duplicate.")
            .count();
        assert_eq!(dupes, 1);
        assert_eq!(report.duplicates, 1);
    }

    #[test]
    fn duplicate_ids_across_bank_batches_keep_one_row() {
        let batches = vec![
            (
                Bank::Cbe,
                vec![raw("gp:9", Some("same id twice"), Some(3), Some("2024-01-05T08:00:00"))],
            ),
            (
                Bank::Boa,
                vec![raw("gp:9", Some("same id twice"), Some(3), Some("2024-01-05T08:00:00"))],
            ),
        ];
        let (cleaned, report) = clean_reviews(&batches);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].bank, Bank::Cbe);
        assert_eq!(report.duplicates, 1);
    }

    #[test]
    fn normalizes_dates_and_strips_whitespace() {
        let (cleaned, _) = clean_reviews(&sample_batches());
        assert!(cleaned.iter().all(|row| {
            row.date.len() == 10 && row.date.as_bytes()[4] == b'-' && row.date.as_bytes()[7] == b'-'
        }));
        let padded = cleaned.iter().find(|row| row.rating == 4).unwrap();
        assert_eq!(padded.review, "Needs more features.");
    }

    #[test]
    fn rating_out_of_range_is_a_quality_drop() {
        let batches = vec![(
            Bank::Boa,
            vec![
                raw("gp:10", Some("zero stars"), Some(0), Some("2024-01-01T00:00:00")),
                raw("gp:11", Some("six stars"), Some(6), Some("2024-01-01T00:00:00")),
                raw("gp:12", Some("fine"), Some(3), Some("2024-01-01T00:00:00")),
            ],
        )];
        let (cleaned, report) = clean_reviews(&batches);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(report.bad_rating, 2);
        assert!(cleaned.iter().all(|row| (1..=5).contains(&row.rating)));
    }

    #[test]
    fn unparseable_timestamp_is_a_quality_drop() {
        let batches = vec![(
            Bank::Cbe,
            vec![raw("gp:13", Some("when?"), Some(3), Some("yesterday"))],
        )];
        let (cleaned, report) = clean_reviews(&batches);
        assert!(cleaned.is_empty());
        assert_eq!(report.bad_date, 1);
    }

    #[test]
    fn drop_rate_counts_quality_drops_only() {
        let (_, report) = clean_reviews(&sample_batches());
        assert_eq!(report.fetched, 6);
        assert_eq!(report.kept, 3);
        assert_eq!(report.quality_drops(), 2);
        assert_eq!(report.total_drops(), 3);
        let expected = 2.0 / 6.0 * 100.0;
        assert!((report.drop_rate_percent() - expected).abs() < 1e-9);
    }

    #[test]
    fn empty_input_yields_empty_output_and_zero_kpi() {
        let (cleaned, report) = clean_reviews(&[]);
        assert!(cleaned.is_empty());
        assert_eq!(report.drop_rate_percent(), 0.0);
    }

    #[test]
    fn crash_on_login_row_cleans_as_expected() {
        let batches = vec![(
            Bank::Cbe,
            vec![raw("r1", Some("App crashes on login"), Some(1), Some("2023-10-24T10:00:00"))],
        )];
        let (cleaned, _) = clean_reviews(&batches);
        assert_eq!(
            cleaned,
            vec![CleanedReview {
                review: "App crashes on login".to_string(),
                rating: 1,
                date: "2023-10-24".to_string(),
                bank: Bank::Cbe,
                source: "Google Play Store",
            }]
        );
    }

    #[test]
    fn date_formats_normalize() {
        assert_eq!(normalize_date("2023-10-24T10:00:00").as_deref(), Some("2023-10-24"));
        assert_eq!(normalize_date("2023-10-24 10:00:00.123").as_deref(), Some("2023-10-24"));
        assert_eq!(normalize_date("2023-10-24").as_deref(), Some("2023-10-24"));
        assert_eq!(normalize_date("24/10/2023"), None);
    }
}
