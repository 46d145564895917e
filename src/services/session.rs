use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::Store;
use crate::services::{Page, PageRequest, ServiceError};

/// Display view of a session joined with its activity, group and review items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub id: i64,
    pub activity_name: String,
    pub group_name: String,
    pub start_time: String,
    pub end_time: String,
    pub review_items_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordReviewItem {
    pub id: i64,
    pub word_id: i64,
    pub study_session_id: i64,
    pub correct: bool,
    pub created_at: NaiveDateTime,
}

/// A word reviewed in one session, with that session's tally for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionWord {
    pub id: i64,
    pub parts: serde_json::Value,
    pub correct_count: i64,
    pub wrong_count: i64,
}

// End time falls back to the session's own start when it has no reviews.
const SUMMARY_SELECT: &str = r#"
    SELECT
        ss.id,
        sa.name AS activity_name,
        g.name AS group_name,
        strftime('%Y-%m-%d %H:%M:%S', ss.created_at) AS start_time,
        strftime('%Y-%m-%d %H:%M:%S', COALESCE(MAX(wri.created_at), ss.created_at)) AS end_time,
        COUNT(wri.id) AS review_items_count
    FROM study_sessions ss
    JOIN study_activities sa ON ss.study_activity_id = sa.id
    JOIN groups g ON ss.group_id = g.id
    LEFT JOIN word_review_items wri ON ss.id = wri.study_session_id
"#;

#[derive(Clone)]
pub struct SessionSummarizer {
    pool: SqlitePool,
}

impl SessionSummarizer {
    pub fn new(store: Store) -> Self {
        Self {
            pool: store.pool().clone(),
        }
    }

    /// Fails with `NotFound` when the session, its activity or its group is missing.
    pub async fn summarize(&self, session_id: i64) -> Result<SessionSummary, ServiceError> {
        let sql = format!("{SUMMARY_SELECT} WHERE ss.id = ? GROUP BY ss.id");
        let row = sqlx::query(&sql)
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => map_summary(&row),
            None => Err(ServiceError::NotFound(format!("study session {session_id}"))),
        }
    }

    /// Newest sessions first; equal timestamps fall back to descending id.
    pub async fn list_summaries(
        &self,
        request: PageRequest,
    ) -> Result<Page<SessionSummary>, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM study_sessions")
            .fetch_one(&mut *tx)
            .await?;

        let sql = format!(
            "{SUMMARY_SELECT} GROUP BY ss.id ORDER BY ss.created_at DESC, ss.id DESC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query(&sql)
            .bind(request.per_page())
            .bind(request.offset())
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        let items = rows
            .iter()
            .map(map_summary)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            total,
            request,
        })
    }

    /// Appends a session stamped with the current time and returns its summary.
    ///
    /// Group and activity ids are not checked here; see `SQLITE_FOREIGN_KEYS`.
    pub async fn create_session(
        &self,
        group_id: i64,
        study_activity_id: i64,
    ) -> Result<SessionSummary, ServiceError> {
        let created_at = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            INSERT INTO study_sessions (group_id, study_activity_id, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(group_id)
        .bind(study_activity_id)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            ServiceError::from_insert(
                err,
                &format!("group {group_id} or study activity {study_activity_id}"),
            )
        })?;

        let id = result.last_insert_rowid();
        tracing::info!(session_id = id, group_id, study_activity_id, "study session created");

        self.summarize(id).await
    }

    /// Appends one review event stamped with the current time and reads it back.
    pub async fn record_review(
        &self,
        session_id: i64,
        word_id: i64,
        correct: bool,
    ) -> Result<WordReviewItem, ServiceError> {
        let created_at = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            INSERT INTO word_review_items (word_id, study_session_id, correct, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(word_id)
        .bind(session_id)
        .bind(correct)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            ServiceError::from_insert(err, &format!("study session {session_id} or word {word_id}"))
        })?;

        let id = result.last_insert_rowid();

        let row = sqlx::query(
            r#"
            SELECT id, word_id, study_session_id, correct, created_at
            FROM word_review_items
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(review_id = id, session_id, word_id, correct, "word review recorded");

        Ok(WordReviewItem {
            id: row.try_get("id")?,
            word_id: row.try_get("word_id")?,
            study_session_id: row.try_get("study_session_id")?,
            correct: row.try_get("correct")?,
            created_at: row.try_get("created_at")?,
        })
    }

    /// Distinct words reviewed in a session, ordered by word id.
    pub async fn list_session_words(
        &self,
        session_id: i64,
        request: PageRequest,
    ) -> Result<Page<SessionWord>, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT w.id)
            FROM words w
            JOIN word_review_items wri ON w.id = wri.word_id
            WHERE wri.study_session_id = ?
            "#,
        )
        .bind(session_id)
        .fetch_one(&mut *tx)
        .await?;

        let rows = sqlx::query(
            r#"
            SELECT
                w.id,
                w.parts,
                SUM(CASE WHEN wri.correct THEN 1 ELSE 0 END) AS correct_count,
                SUM(CASE WHEN wri.correct THEN 0 ELSE 1 END) AS wrong_count
            FROM words w
            JOIN word_review_items wri ON w.id = wri.word_id
            WHERE wri.study_session_id = ?
            GROUP BY w.id
            ORDER BY w.id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(session_id)
        .bind(request.per_page())
        .bind(request.offset())
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let items = rows
            .iter()
            .map(|row| {
                let raw_parts: String = row.try_get("parts")?;
                Ok(SessionWord {
                    id: row.try_get("id")?,
                    parts: parse_parts(raw_parts),
                    correct_count: row.try_get("correct_count")?,
                    wrong_count: row.try_get("wrong_count")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(Page {
            items,
            total,
            request,
        })
    }
}

fn map_summary(row: &SqliteRow) -> Result<SessionSummary, ServiceError> {
    Ok(SessionSummary {
        id: row.try_get("id")?,
        activity_name: row.try_get("activity_name")?,
        group_name: row.try_get("group_name")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        review_items_count: row.try_get("review_items_count")?,
    })
}

/// Stored parts are JSON text; anything unparseable is passed through as a string.
fn parse_parts(raw: String) -> serde_json::Value {
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(_) => serde_json::Value::String(raw),
    }
}
