use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::db::config::{env_bool, DbConfig};

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Set only when ENABLE_FILE_LOGS is on.
    pub log_dir: Option<PathBuf>,
    pub seed_demo_data: bool,
    pub db: DbConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let host = env_parse("HOST").unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port = env_parse("PORT").unwrap_or(DEFAULT_PORT);

        let log_dir = env_bool("ENABLE_FILE_LOGS", false).then(|| {
            std::env::var("LOG_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./logs"))
        });

        Self {
            host,
            port,
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_dir,
            seed_demo_data: env_bool("SEED_DEMO_DATA", false),
            db: DbConfig::from_env(),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
}
