use axum::{
    response::{IntoResponse, Response},
    Json,
    http::StatusCode,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No data provided")]
    MissingInput,

    #[error("Invalid JSON body: {0}")]
    MalformedInput(String),

    #[error("{0}")]
    ProcessingFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingInput | AppError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            AppError::ProcessingFailure(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

impl From<std::net::AddrParseError> for AppError {
    fn from(err: std::net::AddrParseError) -> Self {
        AppError::ConfigError(format!("Invalid host address: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
