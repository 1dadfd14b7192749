use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dashboard::DashboardError;
use serde_json::json;
use thiserror::Error;
use tracing;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] database::DbError),
    #[error("Dashboard error: {0}")]
    Dashboard(#[from] DashboardError),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Dashboard(DashboardError::EventNotFound(event_id)) => (
                StatusCode::NOT_FOUND,
                format!("Event {} not found", event_id),
            ),
            AppError::Dashboard(dashboard_err) => {
                tracing::error!(error = ?dashboard_err, "Dashboard error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while computing analytics".to_string(),
                )
            }
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
