//! Seam between the pipeline and the text-generation backend.

use crate::config::GenerationParams;
use async_trait::async_trait;
use gemini_core::client::GeminiClient;
use gemini_core::config::GeminiConfig;
use gemini_core::errors::GeminiResult;
use gemini_core::types::GenerationConfig;

/// Answers one prompt. `Ok(None)` means the provider returned no text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> GeminiResult<Option<String>>;
}

/// Builds a provider client for a single invocation.
pub trait ProviderFactory: Send + Sync {
    fn connect(&self, api_key: &str) -> GeminiResult<Box<dyn TextGenerator>>;
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> GeminiResult<Option<String>> {
        self.generate_text(prompt, Some(GenerationConfig::from(params)))
            .await
    }
}

/// Produces [`GeminiClient`]s for the configured model and endpoint
#[derive(Debug, Clone)]
pub struct GeminiProviderFactory {
    config: GeminiConfig,
}

impl GeminiProviderFactory {
    pub fn new(config: GeminiConfig) -> Self {
        Self { config }
    }
}

impl ProviderFactory for GeminiProviderFactory {
    fn connect(&self, api_key: &str) -> GeminiResult<Box<dyn TextGenerator>> {
        let config = self.config.merge(&GeminiConfig {
            api_key: Some(api_key.to_string()),
            model_name: None,
            base_url: None,
        });
        Ok(Box::new(GeminiClient::new(&config)?))
    }
}
