use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::Store;
use crate::services::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetOutcome {
    pub success: bool,
    pub message: String,
}

/// Children first so the deletes also pass with foreign-key enforcement on.
const HISTORY_TABLES: &[&str] = &["word_review_items", "study_sessions"];
const ALL_TABLES: &[&str] = &[
    "word_review_items",
    "study_sessions",
    "word_groups",
    "words",
    "groups",
    "study_activities",
];

#[derive(Clone)]
pub struct HistoryService {
    pool: SqlitePool,
}

impl HistoryService {
    pub fn new(store: Store) -> Self {
        Self {
            pool: store.pool().clone(),
        }
    }

    /// Drops every session and review item; words, groups and activities stay.
    pub async fn reset_history(&self) -> Result<ResetOutcome, ServiceError> {
        self.clear(HISTORY_TABLES).await?;
        tracing::info!("study history reset");
        Ok(ResetOutcome {
            success: true,
            message: "All study history has been reset".to_string(),
        })
    }

    pub async fn full_reset(&self) -> Result<ResetOutcome, ServiceError> {
        self.clear(ALL_TABLES).await?;
        tracing::info!("full reset completed");
        Ok(ResetOutcome {
            success: true,
            message: "System reset complete".to_string(),
        })
    }

    async fn clear(&self, tables: &[&str]) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;
        for table in tables {
            let deleted = sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tracing::debug!(table, deleted, "table cleared");
        }
        tx.commit().await?;
        Ok(())
    }
}
