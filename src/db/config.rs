use std::time::Duration;

/// Connection settings for the SQLite event store.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub sqlite: SqliteConfig,
}

impl DbConfig {
    pub fn from_env() -> Self {
        let url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "sqlite:words.db".to_string());

        Self {
            url,
            max_connections: env_u32("DB_MAX_CONNECTIONS", 5).max(1),
            acquire_timeout: Duration::from_millis(env_u64("DB_ACQUIRE_TIMEOUT_MS", 5000)),
            sqlite: SqliteConfig::from_env(),
        }
    }

    /// Settings for a store at `url` with every other knob at its default.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_millis(5000),
            sqlite: SqliteConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqliteConfig {
    pub journal_mode: SqliteJournalMode,
    pub busy_timeout: Duration,
    /// Off by default: the schema declares foreign keys but historically never enforced them.
    pub foreign_keys: bool,
}

impl SqliteConfig {
    fn from_env() -> Self {
        let journal_mode = std::env::var("SQLITE_JOURNAL_MODE")
            .ok()
            .as_deref()
            .and_then(SqliteJournalMode::parse)
            .unwrap_or(SqliteJournalMode::Wal);

        Self {
            journal_mode,
            busy_timeout: Duration::from_millis(env_u64("SQLITE_BUSY_TIMEOUT_MS", 5000)),
            foreign_keys: env_bool("SQLITE_FOREIGN_KEYS", false),
        }
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            journal_mode: SqliteJournalMode::Wal,
            busy_timeout: Duration::from_millis(5000),
            foreign_keys: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqliteJournalMode {
    Wal,
    Delete,
    Truncate,
    Persist,
    Memory,
    Off,
}

impl SqliteJournalMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "WAL" => Some(Self::Wal),
            "DELETE" => Some(Self::Delete),
            "TRUNCATE" => Some(Self::Truncate),
            "PERSIST" => Some(Self::Persist),
            "MEMORY" => Some(Self::Memory),
            "OFF" => Some(Self::Off),
            _ => None,
        }
    }

    pub(crate) fn to_sqlx(self) -> sqlx::sqlite::SqliteJournalMode {
        use sqlx::sqlite::SqliteJournalMode as Mode;
        match self {
            SqliteJournalMode::Wal => Mode::Wal,
            SqliteJournalMode::Delete => Mode::Delete,
            SqliteJournalMode::Truncate => Mode::Truncate,
            SqliteJournalMode::Persist => Mode::Persist,
            SqliteJournalMode::Memory => Mode::Memory,
            SqliteJournalMode::Off => Mode::Off,
        }
    }
}

pub(crate) fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .as_deref()
        .and_then(parse_bool)
        .unwrap_or(default)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(default)
}
