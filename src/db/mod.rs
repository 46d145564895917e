pub mod config;
pub mod migrate;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::db::config::DbConfig;
use crate::db::migrate::MigrationError;

/// Handle to the event store. Cheap to clone; every clone shares one pool.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn connect(config: &DbConfig) -> Result<Self, DbInitError> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(config.sqlite.journal_mode.to_sqlx())
            .busy_timeout(config.sqlite.busy_timeout)
            .foreign_keys(config.sqlite.foreign_keys);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await?;

        tracing::info!(
            url = %config.url,
            foreign_keys = config.sqlite.foreign_keys,
            "event store connected"
        );

        Ok(Self { pool })
    }

    /// Connects and brings the schema up to date.
    pub async fn open(config: &DbConfig) -> Result<Self, DbInitError> {
        let store = Self::connect(config).await?;
        migrate::run_migrations(store.pool()).await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] MigrationError),
}
