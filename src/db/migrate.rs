use std::collections::HashSet;

use sqlx::{SqliteConnection, SqlitePool};

/// Applied in order; a name is never reused once shipped.
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_init_schema",
        include_str!("../../sql/001_init_schema.sql"),
    ),
    (
        "002_event_log_indexes",
        include_str!("../../sql/002_event_log_indexes.sql"),
    ),
];

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("migration {name} failed: {source}")]
    Migration {
        name: String,
        #[source]
        source: sqlx::Error,
    },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Brings the schema up to date. Each pending migration commits on its own, so
/// a failure leaves the earlier ones applied.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrationError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    let applied: HashSet<String> = sqlx::query_scalar("SELECT name FROM _migrations")
        .fetch_all(pool)
        .await?
        .into_iter()
        .collect();

    let pending: Vec<_> = MIGRATIONS
        .iter()
        .filter(|(name, _)| !applied.contains(*name))
        .collect();

    if pending.is_empty() {
        tracing::debug!(applied = applied.len(), "schema up to date");
        return Ok(());
    }

    for &(name, sql) in pending {
        let mut tx = pool.begin().await?;
        apply(&mut tx, name, sql).await?;
        tx.commit().await?;
        tracing::info!(migration = name, "migration applied");
    }

    Ok(())
}

async fn apply(conn: &mut SqliteConnection, name: &str, sql: &str) -> Result<(), MigrationError> {
    sqlx::raw_sql(sql)
        .execute(&mut *conn)
        .await
        .map_err(|source| MigrationError::Migration {
            name: name.to_string(),
            source,
        })?;

    sqlx::query("INSERT INTO _migrations (name) VALUES (?)")
        .bind(name)
        .execute(&mut *conn)
        .await?;

    Ok(())
}
