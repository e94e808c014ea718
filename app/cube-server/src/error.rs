//! FILENAME: app/cube-server/src/error.rs
//! Server error types with HTTP status code mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cube_engine::CubeError;
use fact_table::FactTableError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    /// Engine rejected the query (unknown column, wrong role)
    #[error("{0}")]
    Cube(#[from] CubeError),

    /// The startup dataset could not be built
    #[error("Dataset error: {0}")]
    Dataset(#[from] FactTableError),

    /// Malformed query parameter
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Cube(_) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log_error!("HTTP", "{}", self);
        } else {
            log_warn!("HTTP", "rejected request: {}", self);
        }
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_errors_are_bad_requests() {
        let err = ServerError::from(CubeError::UnknownColumn("zona".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Unknown column: zona");
    }

    #[test]
    fn test_error_response_status() {
        let response = ServerError::BadRequest("mode".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let response = ServerError::from(io).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_dataset_errors_are_server_errors() {
        let err = ServerError::from(FactTableError::ArityMismatch { expected: 8, found: 7 });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Dataset error: Row has 7 values, schema expects 8");
    }
}
