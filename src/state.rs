use std::time::{Instant, SystemTime};

use crate::db::Store;
use crate::services::dashboard::MetricsEngine;
use crate::services::history::HistoryService;
use crate::services::session::SessionSummarizer;

/// Shared handler state. Every service is built from the one injected store.
#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    store: Store,
    metrics: MetricsEngine,
    sessions: SessionSummarizer,
    history: HistoryService,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            metrics: MetricsEngine::new(store.clone()),
            sessions: SessionSummarizer::new(store.clone()),
            history: HistoryService::new(store.clone()),
            store,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn metrics(&self) -> &MetricsEngine {
        &self.metrics
    }

    pub fn sessions(&self) -> &SessionSummarizer {
        &self.sessions
    }

    pub fn history(&self) -> &HistoryService {
        &self.history
    }
}
