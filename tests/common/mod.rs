#![allow(dead_code)]

use axum::Router;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;
use tempfile::TempDir;

use lang_portal_backend::db::config::DbConfig;
use lang_portal_backend::db::Store;

/// File-backed store that lives as long as this value.
pub struct TestDb {
    _dir: TempDir,
    pub store: Store,
}

impl TestDb {
    pub fn pool(&self) -> &SqlitePool {
        self.store.pool()
    }
}

pub async fn create_test_db() -> TestDb {
    create_test_db_with(|_| {}).await
}

pub async fn create_test_db_with(configure: impl FnOnce(&mut DbConfig)) -> TestDb {
    let dir = TempDir::new().expect("failed to create temp dir");
    let db_path = dir.path().join("test.db");

    let mut config = DbConfig::for_url(format!("sqlite:{}", db_path.display()));
    configure(&mut config);

    let store = Store::open(&config).await.expect("failed to open store");
    TestDb { _dir: dir, store }
}

pub async fn create_test_app() -> (Router, TestDb) {
    let db = create_test_db().await;
    let app = lang_portal_backend::create_app(db.store.clone());
    (app, db)
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, s))
        .expect("valid timestamp")
}

pub async fn insert_group(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query("INSERT INTO groups (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await
        .expect("insert group")
        .last_insert_rowid()
}

pub async fn insert_activity(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query("INSERT INTO study_activities (name, url) VALUES (?, ?)")
        .bind(name)
        .bind("http://test.com")
        .execute(pool)
        .await
        .expect("insert activity")
        .last_insert_rowid()
}

pub async fn insert_word(pool: &SqlitePool, french: &str, english: &str) -> i64 {
    let parts = serde_json::json!({ "french": french, "english": english });
    sqlx::query("INSERT INTO words (parts) VALUES (?)")
        .bind(parts.to_string())
        .execute(pool)
        .await
        .expect("insert word")
        .last_insert_rowid()
}

pub async fn insert_session(
    pool: &SqlitePool,
    group_id: i64,
    activity_id: i64,
    created_at: NaiveDateTime,
) -> i64 {
    sqlx::query(
        "INSERT INTO study_sessions (group_id, study_activity_id, created_at) VALUES (?, ?, ?)",
    )
    .bind(group_id)
    .bind(activity_id)
    .bind(created_at)
    .execute(pool)
    .await
    .expect("insert session")
    .last_insert_rowid()
}

pub async fn insert_review(
    pool: &SqlitePool,
    word_id: i64,
    session_id: i64,
    correct: bool,
    created_at: NaiveDateTime,
) -> i64 {
    sqlx::query(
        "INSERT INTO word_review_items (word_id, study_session_id, correct, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(word_id)
    .bind(session_id)
    .bind(correct)
    .bind(created_at)
    .execute(pool)
    .await
    .expect("insert review")
    .last_insert_rowid()
}
