use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("pokemon {0} not found")]
    NotFound(String),

    #[error("trainer {0} not found")]
    UnknownTrainer(String),

    #[error("region {0} not found")]
    UnknownRegion(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("upstream API error: {0}")]
    Upstream(String),

    #[error("stat {0} missing from upstream record")]
    MissingStat(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::NotFound(_)
            | AppError::UnknownTrainer(_)
            | AppError::UnknownRegion(_) => StatusCode::NOT_FOUND,
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            // MissingStat means the upstream schema drifted under us.
            AppError::Upstream(_) | AppError::MissingStat(_) | AppError::Http(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
