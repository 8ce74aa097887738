use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::GeminiConfig;
use crate::errors::{GeminiError, GeminiResult};
use crate::types::*;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for interacting with the Gemini API
///
/// The key travels in the `x-goog-api-key` header rather than the query
/// string, so transport errors (which echo the URL) never contain it.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini API client
    pub fn new(config: &GeminiConfig) -> GeminiResult<Self> {
        let api_key = config.require_api_key()?.to_string();

        Ok(Self {
            client: Client::new(),
            api_key,
            model_name: config.model().to_string(),
            base_url: config.base_url().to_string(),
        })
    }

    /// Same credentials and endpoint, different model
    pub fn for_model(&self, model_name: &str) -> Self {
        Self {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            model_name: model_name.trim_start_matches("models/").to_string(),
            base_url: self.base_url.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model_name
        )
    }

    fn models_url(&self) -> String {
        format!("{}/v1beta/models", self.base_url)
    }

    /// Generate content using the Gemini API
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        debug!(model = %self.model_name, "Sending generateContent request");

        let response = self
            .client
            .post(self.generate_url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GeminiError::RequestError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                GeminiError::ResponseError(format!("Failed to read error response: {}", e))
            })?;

            return Err(GeminiError::HttpError {
                status_code: status.as_u16(),
                message: format!("API request failed: {}", error_body),
            });
        }

        let response_body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GeminiError::ParsingError(format!("Failed to parse response: {}", e)))?;

        Ok(response_body)
    }

    /// Single-turn generation returning the answer text.
    ///
    /// `Ok(None)` means the call succeeded but the model produced no text
    /// (blocked prompt, empty candidate).
    pub async fn generate_text(
        &self,
        prompt: &str,
        generation_config: Option<GenerationConfig>,
    ) -> GeminiResult<Option<String>> {
        let request = GenerateContentRequest::from_prompt(prompt, generation_config);
        let response = self.generate_content(&request).await?;

        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            debug!(model = %self.model_name, reason, "Prompt was blocked");
        }

        Ok(response.text())
    }

    /// Raw payload of the models listing endpoint
    pub async fn list_models_raw(&self) -> GeminiResult<Value> {
        let response = self
            .client
            .get(self.models_url())
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| GeminiError::RequestError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            GeminiError::ResponseError(format!("Failed to read response: {}", e))
        })?;

        // Error payloads are still JSON; hand them back so callers can print them.
        serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                GeminiError::ParsingError(format!("Failed to parse response: {}", e))
            } else {
                GeminiError::HttpError {
                    status_code: status.as_u16(),
                    message: body.clone(),
                }
            }
        })
    }

    /// Models visible to this key
    pub async fn list_models(&self) -> GeminiResult<ListModelsResponse> {
        let raw = self.list_models_raw().await?;
        Ok(serde_json::from_value(raw)?)
    }
}
