//! Dashboard metrics derived from the study event log.
//!
//! Nothing here is cached: every getter re-reads the rows it aggregates, so two
//! calls with no write in between always agree. Empty tables are not an error;
//! each metric has a zero value for them.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::db::Store;
use crate::services::ServiceError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickStats {
    pub success_rate: f64,
    pub total_study_sessions: i64,
    pub total_active_groups: i64,
    pub study_streak_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudyProgress {
    pub total_words_studied: i64,
    pub total_available_words: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastStudySession {
    pub id: i64,
    pub group_id: i64,
    pub study_activity_id: i64,
    pub group_name: String,
}

#[derive(Clone)]
pub struct MetricsEngine {
    pool: SqlitePool,
}

impl MetricsEngine {
    pub fn new(store: Store) -> Self {
        Self {
            pool: store.pool().clone(),
        }
    }

    /// Percentage of correct review items over the whole log, `0.0` when it is empty.
    pub async fn success_rate(&self) -> Result<f64, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        success_rate(&mut conn).await
    }

    pub async fn total_study_sessions(&self) -> Result<i64, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        total_study_sessions(&mut conn).await
    }

    /// Groups that have at least one session, regardless of how many words they own.
    pub async fn total_active_groups(&self) -> Result<i64, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        total_active_groups(&mut conn).await
    }

    pub async fn study_streak_days(&self) -> Result<i64, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        study_streak_days(&mut conn).await
    }

    /// Distinct words that appear in the review log at least once.
    pub async fn total_words_studied(&self) -> Result<i64, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        total_words_studied(&mut conn).await
    }

    pub async fn total_available_words(&self) -> Result<i64, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        total_available_words(&mut conn).await
    }

    /// All four quick stats, read inside one transaction so they describe the same data.
    pub async fn quick_stats(&self) -> Result<QuickStats, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let stats = QuickStats {
            success_rate: success_rate(&mut tx).await?,
            total_study_sessions: total_study_sessions(&mut tx).await?,
            total_active_groups: total_active_groups(&mut tx).await?,
            study_streak_days: study_streak_days(&mut tx).await?,
        };

        tx.commit().await?;

        tracing::debug!(
            success_rate = stats.success_rate,
            sessions = stats.total_study_sessions,
            active_groups = stats.total_active_groups,
            streak = stats.study_streak_days,
            "quick stats computed"
        );

        Ok(stats)
    }

    pub async fn study_progress(&self) -> Result<StudyProgress, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let progress = StudyProgress {
            total_words_studied: total_words_studied(&mut tx).await?,
            total_available_words: total_available_words(&mut tx).await?,
        };

        tx.commit().await?;
        Ok(progress)
    }

    pub async fn last_study_session(&self) -> Result<Option<LastStudySession>, ServiceError> {
        let row = sqlx::query(
            r#"
            SELECT s.id, s.group_id, s.study_activity_id, g.name AS group_name
            FROM study_sessions s
            JOIN groups g ON s.group_id = g.id
            ORDER BY s.created_at DESC, s.id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(LastStudySession {
            id: row.try_get("id")?,
            group_id: row.try_get("group_id")?,
            study_activity_id: row.try_get("study_activity_id")?,
            group_name: row.try_get("group_name")?,
        }))
    }
}

async fn success_rate(conn: &mut SqliteConnection) -> Result<f64, ServiceError> {
    let row = sqlx::query(
        r#"
        SELECT
            COUNT(*) AS total,
            COALESCE(SUM(CASE WHEN correct THEN 1 ELSE 0 END), 0) AS correct
        FROM word_review_items
        "#,
    )
    .fetch_one(&mut *conn)
    .await?;

    let total: i64 = row.try_get("total")?;
    let correct: i64 = row.try_get("correct")?;
    Ok(percentage(correct, total))
}

async fn total_study_sessions(conn: &mut SqliteConnection) -> Result<i64, ServiceError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM study_sessions")
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

async fn total_active_groups(conn: &mut SqliteConnection) -> Result<i64, ServiceError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT group_id) FROM study_sessions")
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

async fn total_words_studied(conn: &mut SqliteConnection) -> Result<i64, ServiceError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT word_id) FROM word_review_items")
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

async fn total_available_words(conn: &mut SqliteConnection) -> Result<i64, ServiceError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM words")
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

async fn study_streak_days(conn: &mut SqliteConnection) -> Result<i64, ServiceError> {
    // date() yields NULL for a timestamp SQLite cannot read
    let raw_dates: Vec<Option<String>> =
        sqlx::query_scalar("SELECT DISTINCT date(created_at) FROM study_sessions")
            .fetch_all(&mut *conn)
            .await?;

    let dates = raw_dates
        .iter()
        .map(|day| match day.as_deref() {
            Some(day) => NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map_err(|_| ServiceError::Decode(format!("session date {day:?}"))),
            None => Err(ServiceError::Decode(
                "session created_at is not a timestamp".to_string(),
            )),
        })
        .collect::<Result<BTreeSet<_>, _>>()?;

    Ok(consecutive_days_ending_at_latest(&dates))
}

/// Length of the unbroken run of days that ends at the most recent day in `dates`.
///
/// This is not the longest run in history, and it is not anchored at today: a
/// run that ended last week still counts in full.
pub fn consecutive_days_ending_at_latest(dates: &BTreeSet<NaiveDate>) -> i64 {
    let Some(&latest) = dates.last() else {
        return 0;
    };

    let mut streak = 1;
    let mut cursor = latest;
    while let Some(previous) = cursor.pred_opt() {
        if !dates.contains(&previous) {
            break;
        }
        streak += 1;
        cursor = previous;
    }
    streak
}

fn percentage(part: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_log_has_no_streak() {
        assert_eq!(consecutive_days_ending_at_latest(&BTreeSet::new()), 0);
    }

    #[test]
    fn streak_stops_at_first_gap() {
        let latest = day(2026, 3, 10);
        let dates: BTreeSet<_> = [0, 1, 2, 4]
            .into_iter()
            .map(|back| latest - chrono::Duration::days(back))
            .collect();
        assert_eq!(consecutive_days_ending_at_latest(&dates), 3);
    }

    #[test]
    fn single_day_is_a_streak_of_one() {
        let dates: BTreeSet<_> = [day(2025, 1, 1)].into_iter().collect();
        assert_eq!(consecutive_days_ending_at_latest(&dates), 1);
    }

    #[test]
    fn streak_crosses_month_and_year_boundaries() {
        let dates: BTreeSet<_> = [day(2024, 12, 30), day(2024, 12, 31), day(2025, 1, 1)]
            .into_iter()
            .collect();
        assert_eq!(consecutive_days_ending_at_latest(&dates), 3);
    }

    #[test]
    fn older_longer_run_does_not_count() {
        let dates: BTreeSet<_> = [
            day(2025, 5, 1),
            day(2025, 5, 2),
            day(2025, 5, 3),
            day(2025, 5, 4),
            day(2025, 5, 10),
        ]
        .into_iter()
        .collect();
        assert_eq!(consecutive_days_ending_at_latest(&dates), 1);
    }

    #[test]
    fn percentage_of_empty_total_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 2), 50.0);
        assert_eq!(percentage(3, 3), 100.0);
    }
}
