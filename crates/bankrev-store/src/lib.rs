//! Relational persistence for enriched reviews.
//!
//! Two tables: `banks(bank_id, bank_name unique)` and
//! `reviews(review_id, bank_id → banks on delete cascade, ...)`.
//! Bank names are upserted so reruns do not duplicate them; review
//! rows are inserted in one transaction. Any constraint violation or
//! connection failure is fatal to the run, surfaced as [`StoreError`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use rusqlite::{Connection, params};
use thiserror::Error;
use tracing::{debug, info};

use bankrev_model::{Bank, EnrichedReview};

/// Explicit store configuration passed to the persister at
/// construction; there is no ambient credential state.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("no bank_id for {0:?} after upsert")]
    MissingBank(String),
}

/// Counts from one persist call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistReport {
    pub banks: usize,
    pub reviews: usize,
}

/// A review row read back from the store, joined with its bank name.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredReview {
    pub bank_name: String,
    pub review_text: String,
    pub rating: u8,
    pub review_date: String,
    pub sentiment_label: String,
    pub sentiment_score: f64,
    pub themes: String,
}

/// Connection wrapper owning the schema and the persist/load queries.
pub struct ReviewStore {
    conn: Connection,
}

impl ReviewStore {
    /// Open (or create) the database file and ensure the schema.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let conn = Connection::open(&config.db_path)?;
        Self::with_connection(conn)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        // SQLite leaves FK enforcement off unless asked.
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let store = Self { conn };
        store.create_schema()?;
        Ok(store)
    }

    fn create_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS banks (
                 bank_id   INTEGER PRIMARY KEY,
                 bank_name TEXT NOT NULL UNIQUE
             );
             CREATE TABLE IF NOT EXISTS reviews (
                 review_id       INTEGER PRIMARY KEY,
                 bank_id         INTEGER NOT NULL
                                 REFERENCES banks(bank_id) ON DELETE CASCADE,
                 review_text     TEXT,
                 rating          INTEGER,
                 review_date     TEXT,
                 sentiment_label TEXT,
                 sentiment_score REAL,
                 themes          TEXT
             );",
        )?;
        debug!("schema ensured");
        Ok(())
    }

    /// Upsert the distinct bank names, then insert every review row in
    /// one transaction referencing the surrogate keys.
    pub fn persist_reviews(
        &mut self,
        reviews: &[EnrichedReview],
    ) -> Result<PersistReport, StoreError> {
        let tx = self.conn.transaction()?;

        let mut banks: Vec<Bank> = reviews.iter().map(|row| row.review.bank).collect();
        banks.sort();
        banks.dedup();
        for bank in &banks {
            tx.execute(
                "INSERT INTO banks (bank_name) VALUES (?1)
                 ON CONFLICT(bank_name) DO NOTHING",
                params![bank.name()],
            )?;
        }

        let mut bank_ids: BTreeMap<String, i64> = BTreeMap::new();
        {
            let mut stmt = tx.prepare("SELECT bank_id, bank_name FROM banks")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (id, name) = row?;
                bank_ids.insert(name, id);
            }
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO reviews
                     (bank_id, review_text, rating, review_date,
                      sentiment_label, sentiment_score, themes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for enriched in reviews {
                let bank_name = enriched.review.bank.name();
                let bank_id = bank_ids
                    .get(bank_name)
                    .copied()
                    .ok_or_else(|| StoreError::MissingBank(bank_name.to_string()))?;
                stmt.execute(params![
                    bank_id,
                    enriched.review.review,
                    i64::from(enriched.review.rating),
                    enriched.review.date,
                    enriched.sentiment_label.as_str(),
                    enriched.sentiment_score,
                    enriched.themes_joined(),
                ])?;
            }
        }

        tx.commit()?;
        let report = PersistReport {
            banks: banks.len(),
            reviews: reviews.len(),
        };
        info!(
            bank_count = report.banks,
            record_count = report.reviews,
            "reviews persisted"
        );
        Ok(report)
    }

    /// Read every review row back in insertion order.
    pub fn load_reviews(&self) -> Result<Vec<StoredReview>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT b.bank_name, r.review_text, r.rating, r.review_date,
                    r.sentiment_label, r.sentiment_score, r.themes
             FROM reviews r
             JOIN banks b ON b.bank_id = r.bank_id
             ORDER BY r.review_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StoredReview {
                bank_name: row.get(0)?,
                review_text: row.get(1)?,
                // Typed u8 so a corrupted rating fails the read instead
                // of truncating.
                rating: row.get(2)?,
                review_date: row.get(3)?,
                sentiment_label: row.get(4)?,
                sentiment_score: row.get(5)?,
                themes: row.get(6)?,
            })
        })?;
        let mut reviews = Vec::new();
        for row in rows {
            reviews.push(row?);
        }
        Ok(reviews)
    }

    /// Truncate the review table; banks stay. Reruns either call this
    /// first or accumulate rows, there is no update-in-place.
    pub fn clear_reviews(&self) -> Result<usize, StoreError> {
        let deleted = self.conn.execute("DELETE FROM reviews", [])?;
        info!(record_count = deleted, "reviews cleared");
        Ok(deleted)
    }

    /// Delete a bank; its reviews go with it via the FK cascade.
    pub fn delete_bank(&self, bank: Bank) -> Result<usize, StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM banks WHERE bank_name = ?1", params![bank.name()])?;
        Ok(deleted)
    }

    /// Count rows in the reviews table.
    pub fn review_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM reviews", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
