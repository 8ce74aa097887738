use thiserror::Error;

/// Gemini API errors
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("Response Error: {0}")]
    ResponseError(String),

    #[error("Parsing Error: {0}")]
    ParsingError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },

    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
}

impl GeminiError {
    /// True when the provider rejected the call because of quota or rate limits.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GeminiError::HttpError { status_code: 429, .. })
    }

    /// One-line form of the error, capped at `max_chars` characters.
    ///
    /// When an HTTP error carries the provider's JSON error payload, only its
    /// `error.message` is kept; otherwise the first non-blank line is used.
    pub fn summary(&self, max_chars: usize) -> String {
        let line = match self {
            GeminiError::HttpError {
                status_code,
                message,
            } => match api_error_message(message) {
                Some(detail) => format!("HTTP Error: {} - {}", status_code, detail),
                None => first_line(&self.to_string()),
            },
            other => first_line(&other.to_string()),
        };
        line.chars().take(max_chars).collect()
    }
}

/// `error.message` of a Gemini error payload embedded in `text`.
fn api_error_message(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let payload: serde_json::Value = serde_json::from_str(&text[start..]).ok()?;
    let message = payload.get("error")?.get("message")?.as_str()?;
    let collapsed = message.split_whitespace().collect::<Vec<_>>().join(" ");
    Some(collapsed).filter(|m| !m.is_empty())
}

fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Result type for Gemini operations
pub type GeminiResult<T> = Result<T, GeminiError>;
