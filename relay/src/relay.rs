//! The per-request pipeline: extract, ask, shape, deliver.

use crate::config::PolicyConfig;
use crate::delivery::CallbackSink;
use crate::identity::{extract_channel, extract_identity, CallerIdentity};
use crate::outcome::{Outcome, ShapedResponse};
use crate::prompt::build_prompt;
use crate::provider::ProviderFactory;
use crate::request::InboundRequest;
use crate::shaping::shape;
use gemini_core::errors::GeminiResult;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Longest error detail carried into a 500 body
const ERROR_DETAIL_CHARS: usize = 120;

/// Stateless relay; one instance serves every request.
#[derive(Clone)]
pub struct Relay {
    policy: PolicyConfig,
    providers: Arc<dyn ProviderFactory>,
    callbacks: Arc<dyn CallbackSink>,
}

impl Relay {
    pub fn new(
        policy: PolicyConfig,
        providers: Arc<dyn ProviderFactory>,
        callbacks: Arc<dyn CallbackSink>,
    ) -> Self {
        Self {
            policy,
            providers,
            callbacks,
        }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Runs one invocation to its terminal [`Outcome`].
    ///
    /// `api_key` is checked only once a query is known to exist, and before
    /// any provider client is built.
    pub async fn handle(&self, request: &InboundRequest, api_key: Option<&str>) -> Outcome {
        let query = request.extract_query();
        if query.is_empty() {
            debug!("No query supplied");
            return Outcome::Prompt;
        }

        let caller = extract_identity(request);
        let channel = extract_channel(request);
        info!(
            query_len = query.chars().count(),
            caller = %caller.display_name,
            channel = channel.as_ref().map(|c| c.name.as_str()).unwrap_or("-"),
            "Relaying query"
        );

        let Some(api_key) = api_key.filter(|key| !key.trim().is_empty()) else {
            error!("Provider API key is not configured");
            return Outcome::ConfigError;
        };

        let answer = match self.ask(&query, &caller, api_key).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(error = %e, rate_limited = e.is_rate_limited(), "Provider call failed");
                return Outcome::ProviderError(e.summary(ERROR_DETAIL_CHARS));
            }
        };

        if answer.is_none() {
            warn!("Provider returned no text, using fallback answer");
        }

        let text = shape(
            answer.as_deref(),
            &self.policy.fallback_answer,
            self.policy.char_limit,
        );
        self.deliver(request.callback_url(), text).await
    }

    /// [`handle`](Self::handle) rendered as status and body
    pub async fn respond(&self, request: &InboundRequest, api_key: Option<&str>) -> ShapedResponse {
        let outcome = self.handle(request, api_key).await;
        info!(outcome = outcome.label(), status = outcome.status_code(), "Request finished");
        outcome.into_response(&self.policy)
    }

    async fn ask(
        &self,
        query: &str,
        caller: &CallerIdentity,
        api_key: &str,
    ) -> GeminiResult<Option<String>> {
        let provider = self.providers.connect(api_key)?;
        let prompt = build_prompt(&self.policy, query, caller);
        provider.generate(&prompt, &self.policy.generation).await
    }

    /// Posts to the callback when there is one; a failed post degrades to
    /// returning the text directly.
    pub async fn deliver(&self, callback_url: Option<&str>, text: String) -> Outcome {
        let Some(url) = callback_url else {
            return Outcome::DirectAnswer(text);
        };

        match self.callbacks.deliver(url, &text).await {
            Ok(()) => Outcome::Acknowledged,
            Err(e) => {
                warn!(error = %e, "Callback delivery failed, answering directly");
                Outcome::FallbackAnswer(text)
            }
        }
    }
}
