//! CSV checkpoint artifacts between the run-once commands.
//!
//! The cleaned checkpoint carries `review,rating,date,bank,source`;
//! the enriched checkpoint appends the sentiment and theme columns.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use bankrev_model::{Bank, CleanedReview, EnrichedReview, REVIEW_SOURCE, SentimentLabel};

const CLEANED_HEADERS: [&str; 5] = ["review", "rating", "date", "bank", "source"];
const ENRICHED_HEADERS: [&str; 8] = [
    "review",
    "rating",
    "date",
    "bank",
    "source",
    "sentiment_label",
    "sentiment_score",
    "themes",
];

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("csv error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("{path} row {row}: {message}")]
    BadRow {
        path: PathBuf,
        row: usize,
        message: String,
    },
    #[error("{path}: unexpected header {found:?}")]
    BadHeader { path: PathBuf, found: Vec<String> },
}

fn csv_err(path: &Path) -> impl Fn(csv::Error) -> CheckpointError + '_ {
    move |source| CheckpointError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Write the cleaned review table.
pub fn write_cleaned_csv(path: &Path, reviews: &[CleanedReview]) -> Result<(), CheckpointError> {
    let mut writer = csv::Writer::from_path(path).map_err(csv_err(path))?;
    writer.write_record(CLEANED_HEADERS).map_err(csv_err(path))?;
    for review in reviews {
        writer
            .write_record([
                review.review.as_str(),
                &review.rating.to_string(),
                &review.date,
                review.bank.code(),
                review.source,
            ])
            .map_err(csv_err(path))?;
    }
    writer.flush().map_err(|source| CheckpointError::Csv {
        path: path.to_path_buf(),
        source: source.into(),
    })?;
    info!(path = %path.display(), record_count = reviews.len(), "cleaned checkpoint written");
    Ok(())
}

/// Read the cleaned review table back.
pub fn read_cleaned_csv(path: &Path) -> Result<Vec<CleanedReview>, CheckpointError> {
    let mut reader = csv::Reader::from_path(path).map_err(csv_err(path))?;
    check_headers(path, &mut reader, &CLEANED_HEADERS)?;
    let mut reviews = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err(path))?;
        let row = idx + 2; // 1-based, after the header line
        reviews.push(parse_cleaned_record(path, row, &record)?);
    }
    debug!(path = %path.display(), record_count = reviews.len(), "cleaned checkpoint read");
    Ok(reviews)
}

/// Write the enriched review table.
pub fn write_enriched_csv(path: &Path, reviews: &[EnrichedReview]) -> Result<(), CheckpointError> {
    let mut writer = csv::Writer::from_path(path).map_err(csv_err(path))?;
    writer
        .write_record(ENRICHED_HEADERS)
        .map_err(csv_err(path))?;
    for enriched in reviews {
        let review = &enriched.review;
        writer
            .write_record([
                review.review.as_str(),
                &review.rating.to_string(),
                &review.date,
                review.bank.code(),
                review.source,
                enriched.sentiment_label.as_str(),
                &format!("{:.9}", enriched.sentiment_score),
                &enriched.themes_joined(),
            ])
            .map_err(csv_err(path))?;
    }
    writer.flush().map_err(|source| CheckpointError::Csv {
        path: path.to_path_buf(),
        source: source.into(),
    })?;
    info!(path = %path.display(), record_count = reviews.len(), "enriched checkpoint written");
    Ok(())
}

/// Read the enriched review table back.
pub fn read_enriched_csv(path: &Path) -> Result<Vec<EnrichedReview>, CheckpointError> {
    let mut reader = csv::Reader::from_path(path).map_err(csv_err(path))?;
    check_headers(path, &mut reader, &ENRICHED_HEADERS)?;
    let mut reviews = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err(path))?;
        let row = idx + 2;
        let cleaned = parse_cleaned_record(path, row, &record)?;
        let label: SentimentLabel = field(path, row, &record, 5)?
            .parse()
            .map_err(|error| bad_row(path, row, format!("{error}")))?;
        let score: f64 = field(path, row, &record, 6)?
            .parse()
            .map_err(|error| bad_row(path, row, format!("sentiment_score: {error}")))?;
        let themes = EnrichedReview::split_themes(field(path, row, &record, 7)?);
        reviews.push(EnrichedReview {
            review: cleaned,
            sentiment_label: label,
            sentiment_score: score,
            themes,
        });
    }
    debug!(path = %path.display(), record_count = reviews.len(), "enriched checkpoint read");
    Ok(reviews)
}

fn check_headers<R: std::io::Read>(
    path: &Path,
    reader: &mut csv::Reader<R>,
    expected: &[&str],
) -> Result<(), CheckpointError> {
    let headers = reader.headers().map_err(csv_err(path))?;
    let found: Vec<String> = headers.iter().map(String::from).collect();
    if found.len() < expected.len()
        || !expected
            .iter()
            .zip(found.iter())
            .all(|(want, got)| want.eq_ignore_ascii_case(got))
    {
        return Err(CheckpointError::BadHeader {
            path: path.to_path_buf(),
            found,
        });
    }
    Ok(())
}

/// Parse the five cleaned columns, re-checking the cleaned invariants
/// so a hand-edited checkpoint cannot smuggle bad rows downstream.
fn parse_cleaned_record(
    path: &Path,
    row: usize,
    record: &csv::StringRecord,
) -> Result<CleanedReview, CheckpointError> {
    let review = field(path, row, record, 0)?.trim().to_string();
    if review.is_empty() {
        return Err(bad_row(path, row, "blank review".to_string()));
    }
    let rating: u8 = field(path, row, record, 1)?
        .parse()
        .map_err(|error| bad_row(path, row, format!("rating: {error}")))?;
    if !(1..=5).contains(&rating) {
        return Err(bad_row(path, row, format!("rating {rating} out of range")));
    }
    let date = field(path, row, record, 2)?.to_string();
    let bank: Bank = field(path, row, record, 3)?
        .parse()
        .map_err(|error| bad_row(path, row, format!("{error}")))?;
    Ok(CleanedReview {
        review,
        rating,
        date,
        bank,
        source: REVIEW_SOURCE,
    })
}

fn field<'r>(
    path: &Path,
    row: usize,
    record: &'r csv::StringRecord,
    idx: usize,
) -> Result<&'r str, CheckpointError> {
    record
        .get(idx)
        .ok_or_else(|| bad_row(path, row, format!("missing column {idx}")))
}

fn bad_row(path: &Path, row: usize, message: String) -> CheckpointError {
    CheckpointError::BadRow {
        path: path.to_path_buf(),
        row,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn sample_cleaned() -> Vec<CleanedReview> {
        vec![
            CleanedReview {
                review: "App crashes on login".to_string(),
                rating: 1,
                date: "2023-10-24".to_string(),
                bank: Bank::Cbe,
                source: REVIEW_SOURCE,
            },
            CleanedReview {
                review: "Fast, simple transfers".to_string(),
                rating: 5,
                date: "2023-11-02".to_string(),
                bank: Bank::Dashen,
                source: REVIEW_SOURCE,
            },
        ]
    }

    #[test]
    fn cleaned_csv_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");
        let reviews = sample_cleaned();
        write_cleaned_csv(&path, &reviews).unwrap();
        let restored = read_cleaned_csv(&path).unwrap();
        assert_eq!(restored, reviews);
    }

    #[test]
    fn enriched_csv_round_trips_including_commas_in_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enriched.csv");
        let cleaned = sample_cleaned();
        let enriched = vec![
            EnrichedReview {
                review: cleaned[0].clone(),
                sentiment_label: SentimentLabel::Negative,
                sentiment_score: -0.875,
                themes: ["Reliability & Bugs", "Account & Login Issues"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            },
            EnrichedReview {
                review: cleaned[1].clone(),
                sentiment_label: SentimentLabel::Positive,
                sentiment_score: 0.75,
                themes: BTreeSet::new(),
            },
        ];
        write_enriched_csv(&path, &enriched).unwrap();
        let restored = read_enriched_csv(&path).unwrap();
        assert_eq!(restored, enriched);
    }

    #[test]
    fn wrong_header_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "a,b,c\n1,2,3\n").unwrap();
        assert!(matches!(
            read_cleaned_csv(&path),
            Err(CheckpointError::BadHeader { .. })
        ));
    }

    #[test]
    fn out_of_range_rating_is_rejected_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edited.csv");
        std::fs::write(
            &path,
            "review,rating,date,bank,source\nzero stars,0,2024-01-01,CBE,Google Play Store\n",
        )
        .unwrap();
        match read_cleaned_csv(&path) {
            Err(CheckpointError::BadRow { row, message, .. }) => {
                assert_eq!(row, 2);
                assert!(message.contains("out of range"));
            }
            other => panic!("expected BadRow, got {other:?}"),
        }
    }

    #[test]
    fn blank_review_is_rejected_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edited.csv");
        std::fs::write(
            &path,
            "review,rating,date,bank,source\n   ,3,2024-01-01,Dashen,Google Play Store\n",
        )
        .unwrap();
        assert!(matches!(
            read_cleaned_csv(&path),
            Err(CheckpointError::BadRow { row: 2, .. })
        ));
    }

    #[test]
    fn bad_rating_is_reported_with_row_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad_row.csv");
        std::fs::write(
            &path,
            "review,rating,date,bank,source\nok,notanumber,2024-01-01,CBE,Google Play Store\n",
        )
        .unwrap();
        match read_cleaned_csv(&path) {
            Err(CheckpointError::BadRow { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected BadRow, got {other:?}"),
        }
    }
}
