use thiserror::Error;

/// Errors raised outside the per-request pipeline: startup, config, serving.
///
/// Request-level failures never surface as this type; they end up as an
/// [`Outcome`](crate::outcome::Outcome) instead.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Logger Error: {0}")]
    Logger(String),

    #[error("Server Error: {0}")]
    Server(String),

    #[error(transparent)]
    Gemini(#[from] gemini_core::GeminiError),
}

pub type RelayResult<T> = Result<T, RelayError>;
