use chrono::Utc;
use tracing::instrument;

use lingua_core::ids::TranslationId;
use lingua_core::record::{self, NewTranslation, TranslationRecord};

use crate::database::Database;
use crate::error::StoreError;
use crate::row_helpers;

/// Repository for translation records. Records are immutable once
/// inserted; the only mutation is deletion by id.
pub struct TranslationRepo {
    db: Database,
}

impl TranslationRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new record. The id, word count (whitespace tokens of the
    /// source text), and timestamp are assigned here, not by the caller.
    #[instrument(skip(self, new), fields(pair = %format!("{}|{}", new.source_language, new.target_language)))]
    pub fn insert(&self, new: &NewTranslation) -> Result<TranslationRecord, StoreError> {
        let id = TranslationId::new();
        let word_count = record::word_count(&new.source_text);
        let now = Utc::now().to_rfc3339();

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO translations (id, source_language, target_language, source_text, translated_text, word_count, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    id.as_str(),
                    new.source_language,
                    new.target_language,
                    new.source_text,
                    new.translated_text,
                    word_count,
                    now,
                ],
            )?;

            Ok(TranslationRecord {
                id,
                source_language: new.source_language.clone(),
                target_language: new.target_language.clone(),
                source_text: new.source_text.clone(),
                translated_text: new.translated_text.clone(),
                word_count,
                created_at: now,
            })
        })
    }

    /// Get a record by id.
    #[instrument(skip(self), fields(translation_id = %id))]
    pub fn get(&self, id: &TranslationId) -> Result<TranslationRecord, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, source_language, target_language, source_text, translated_text, word_count, created_at
                 FROM translations WHERE id = ?1",
            )?;
            let mut rows = stmt.query([id.as_str()])?;
            match rows.next()? {
                Some(row) => row_to_record(row),
                None => Err(StoreError::NotFound(format!("translation {id}"))),
            }
        })
    }

    /// List records ordered by recency (newest first), bounded by `limit`.
    /// The id tie-breaks equal timestamps since ids are time-ordered.
    #[instrument(skip(self))]
    pub fn list(&self, limit: u32) -> Result<Vec<TranslationRecord>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, source_language, target_language, source_text, translated_text, word_count, created_at
                 FROM translations ORDER BY created_at DESC, id DESC LIMIT ?1",
            )?;
            let mut rows = stmt.query([limit])?;
            let mut results = Vec::new();
            while let Some(row) = rows.next()? {
                results.push(row_to_record(row)?);
            }
            Ok(results)
        })
    }

    /// Delete a record by id. Errors with NotFound when no row matched.
    #[instrument(skip(self), fields(translation_id = %id))]
    pub fn delete(&self, id: &TranslationId) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            let affected = conn.execute(
                "DELETE FROM translations WHERE id = ?1",
                [id.as_str()],
            )?;
            if affected == 0 {
                return Err(StoreError::NotFound(format!("translation {id}")));
            }
            Ok(())
        })
    }

    /// Total number of stored records.
    pub fn count(&self) -> Result<i64, StoreError> {
        self.db.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM translations", [], |row| row.get(0))
                .map_err(StoreError::from)
        })
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> Result<TranslationRecord, StoreError> {
    Ok(TranslationRecord {
        id: TranslationId::from_raw(row_helpers::get::<String>(row, 0, "translations", "id")?),
        source_language: row_helpers::get(row, 1, "translations", "source_language")?,
        target_language: row_helpers::get(row, 2, "translations", "target_language")?,
        source_text: row_helpers::get(row, 3, "translations", "source_text")?,
        translated_text: row_helpers::get(row, 4, "translations", "translated_text")?,
        word_count: row_helpers::get::<i64>(row, 5, "translations", "word_count")? as u32,
        created_at: row_helpers::get(row, 6, "translations", "created_at")?,
    })
}
