use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use minigql_core::GqlError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("Schema error: {0}")]
    Schema(#[from] GqlError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::Schema(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = serde_json::json!({
            "errors": [{ "message": self.to_string() }]
        });

        (status, Json(body)).into_response()
    }
}
