use axum::http::StatusCode;
use thiserror::Error;

/// Generic message returned when a failure has no more specific description
pub const UNEXPECTED_MESSAGE: &str = "Erro inesperado ao analisar o site. Tente novamente mais tarde.";

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by analysis requests
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed URL or email in the request
    #[error("{0}")]
    Validation(String),

    /// Missing or unusable configuration, e.g. no API key
    #[error("{0}")]
    Config(String),

    /// The upstream analysis API failed or returned something unreadable
    #[error("Falha ao consultar o PageSpeed ({strategy}): {detail}")]
    UpstreamFetch { strategy: String, detail: String },

    /// Anything else; the detail is only logged
    #[error("Erro inesperado ao analisar o site. Tente novamente mais tarde.")]
    Unexpected(String),

    #[error("Erro de E/S: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn upstream(strategy: impl ToString, detail: impl ToString) -> Self {
        Error::UpstreamFetch {
            strategy: strategy.to_string(),
            detail: detail.to_string(),
        }
    }

    /// HTTP status an error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
