use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::response;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Summarization service error: {0}")]
    Upstream(String),

    #[error("Summarization service timed out: {0}")]
    UpstreamTimeout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Config(_) | AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown on the page. Upstream details stay in the log.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Upstream(_) => {
                "The summarization service failed. Please try again.".to_string()
            }
            AppError::UpstreamTimeout(_) => {
                "The summarization service timed out. Please try again.".to_string()
            }
            AppError::Config(_) | AppError::Unexpected(_) => "Something went wrong.".to_string(),
        }
    }

    /// Whether the failure is the user's to fix, as opposed to ours or the upstream's.
    pub fn is_user_error(&self) -> bool {
        matches!(self, AppError::InvalidInput(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        response::error(self.status(), self.user_message(), None).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL stays out of messages that end up in logs
        let err = err.without_url();
        if err.is_timeout() {
            AppError::UpstreamTimeout(err.to_string())
        } else {
            AppError::Upstream(err.to_string())
        }
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        AppError::Unexpected(format!("Failed to render template: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
