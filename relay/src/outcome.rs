use crate::config::PolicyConfig;
use crate::shaping::clamp;

/// Terminal state of one relay invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No usable query; ask the user for one
    Prompt,
    /// Answer returned in the response body
    DirectAnswer(String),
    /// Answer posted to the callback URL
    Acknowledged,
    /// Callback failed; answer returned in the body instead
    FallbackAnswer(String),
    /// Provider credential missing
    ConfigError,
    /// Provider call failed; carries a one-line error summary
    ProviderError(String),
}

/// What goes back over HTTP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapedResponse {
    pub status_code: u16,
    pub body: String,
}

impl Outcome {
    pub fn status_code(&self) -> u16 {
        match self {
            Outcome::ConfigError | Outcome::ProviderError(_) => 500,
            _ => 200,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Prompt => "prompt",
            Outcome::DirectAnswer(_) => "direct",
            Outcome::Acknowledged => "acknowledged",
            Outcome::FallbackAnswer(_) => "fallback",
            Outcome::ConfigError => "config_error",
            Outcome::ProviderError(_) => "provider_error",
        }
    }

    /// Every body is capped at the policy's character limit.
    pub fn into_response(self, policy: &PolicyConfig) -> ShapedResponse {
        let status_code = self.status_code();
        let messages = &policy.messages;
        let body = match self {
            Outcome::Prompt => messages.missing_query.clone(),
            Outcome::DirectAnswer(text) | Outcome::FallbackAnswer(text) => text,
            Outcome::Acknowledged => messages.acknowledged.clone(),
            Outcome::ConfigError => messages.config_error.clone(),
            Outcome::ProviderError(detail) => format!("{} ({})", messages.provider_error, detail),
        };

        ShapedResponse {
            status_code,
            body: clamp(&body, policy.char_limit),
        }
    }
}
