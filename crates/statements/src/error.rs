use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::statement::StatementError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Statement(StatementError),
    Blocking(tokio::task::JoinError),
    InvalidRequest(String),
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Server(err) => write!(f, "server error: {err}"),
            AppError::Statement(err) => write!(f, "statement error: {err}"),
            AppError::Blocking(err) => write!(f, "background task error: {err}"),
            AppError::InvalidRequest(reason) => write!(f, "invalid request: {reason}"),
            AppError::NotFound(resource) => write!(f, "not found: {resource}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Statement(err) => Some(err),
            AppError::Blocking(err) => Some(err),
            AppError::InvalidRequest(_) | AppError::NotFound(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Statement(err) => match err {
                StatementError::NotFound { .. } | StatementError::NoSubmissions => {
                    StatusCode::NOT_FOUND
                }
                StatementError::MissingField { .. } | StatementError::Period(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                StatementError::Transport(_) | StatementError::Disk(_) => StatusCode::BAD_GATEWAY,
                StatementError::Document(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<StatementError> for AppError {
    fn from(value: StatementError) -> Self {
        Self::Statement(value)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Blocking(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_statements_map_to_404() {
        let error = AppError::from(StatementError::NotFound {
            ticket: "000892".to_string(),
        });
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn transport_failures_map_to_bad_gateway() {
        let error = AppError::from(StatementError::Transport(
            crate::workflows::statement::FormsError::Status { status: 500 },
        ));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn missing_fields_map_to_unprocessable() {
        let error = AppError::from(StatementError::MissingField { field: "Группа" });
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
