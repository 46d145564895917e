mod dashboard;
mod health;
mod history;
mod study_sessions;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde::Deserialize;

use crate::response::{json_error, AppError};
use crate::services::{PageRequest, DEFAULT_PAGE, DEFAULT_PER_PAGE};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/health", health::router())
        .nest("/dashboard", dashboard::router())
        .nest("/study_sessions", study_sessions::router())
        .merge(history::router());

    Router::new()
        .nest("/api", api)
        .fallback(fallback_handler)
        .with_state(state)
}

/// Raw `page` / `per_page` query values. Anything missing, unparseable or below 1
/// falls back to the default instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PaginationQuery {
    page: Option<String>,
    per_page: Option<String>,
}

impl PaginationQuery {
    pub(crate) fn to_request(&self) -> PageRequest {
        PageRequest::new(
            parse_positive(self.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            parse_positive(self.per_page.as_deref()).unwrap_or(DEFAULT_PER_PAGE),
        )
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value >= 1)
}

pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::bad_request(format!("invalid {what} id")))
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, per_page: Option<&str>) -> PaginationQuery {
        PaginationQuery {
            page: page.map(str::to_string),
            per_page: per_page.map(str::to_string),
        }
    }

    #[test]
    fn missing_values_use_defaults() {
        let request = query(None, None).to_request();
        assert_eq!(request.page(), DEFAULT_PAGE);
        assert_eq!(request.per_page(), DEFAULT_PER_PAGE);
    }

    #[test]
    fn bad_values_are_clamped_to_defaults() {
        let request = query(Some("0"), Some("abc")).to_request();
        assert_eq!(request.page(), 1);
        assert_eq!(request.per_page(), 100);

        let request = query(Some("-3"), Some("0")).to_request();
        assert_eq!(request.page(), 1);
        assert_eq!(request.per_page(), 100);
    }

    #[test]
    fn explicit_values_are_kept() {
        let request = query(Some("3"), Some("20")).to_request();
        assert_eq!(request.page(), 3);
        assert_eq!(request.per_page(), 20);
        assert_eq!(request.offset(), 40);
    }

    #[test]
    fn ids_must_be_numeric() {
        assert_eq!(parse_id("42", "session").ok(), Some(42));
        assert!(parse_id("abc", "session").is_err());
    }
}
