use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reporter::error::ReporterError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] database::DbError),
    #[error("Report error: {0}")]
    Report(#[from] ReporterError),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Report(ReporterError::UserNotFound(username)) => (
                StatusCode::NOT_FOUND,
                ReporterError::UserNotFound(username).to_string(),
            ),
            AppError::Report(report_err) => {
                tracing::error!(error = ?report_err, "Report error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while building the report".to_string(),
                )
            }
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
