#![allow(dead_code)]

use async_trait::async_trait;
use gemini_core::errors::{GeminiError, GeminiResult};
use gemini_relay::config::GenerationParams;
use gemini_relay::delivery::{CallbackSink, DeliveryError};
use gemini_relay::provider::{ProviderFactory, TextGenerator};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub enum Reply {
    Text(String),
    Empty,
    Fail(u16),
}

/// Provider double that records every prompt it is asked
#[derive(Clone)]
pub struct ScriptedProviders {
    reply: Reply,
    pub prompts: Arc<Mutex<Vec<String>>>,
    pub connects: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProviders {
    pub fn answering(text: &str) -> Self {
        Self::with_reply(Reply::Text(text.to_string()))
    }

    pub fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            prompts: Arc::new(Mutex::new(Vec::new())),
            connects: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

struct ScriptedGenerator {
    reply: Reply,
    prompts: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _params: &GenerationParams) -> GeminiResult<Option<String>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Reply::Text(text) => Ok(Some(text.clone())),
            Reply::Empty => Ok(None),
            Reply::Fail(status_code) => Err(GeminiError::HttpError {
                status_code: *status_code,
                message: "API request failed: quota exceeded".to_string(),
            }),
        }
    }
}

impl ProviderFactory for ScriptedProviders {
    fn connect(&self, api_key: &str) -> GeminiResult<Box<dyn TextGenerator>> {
        self.connects.lock().unwrap().push(api_key.to_string());
        Ok(Box::new(ScriptedGenerator {
            reply: self.reply.clone(),
            prompts: self.prompts.clone(),
        }))
    }
}

/// Callback double that records deliveries and can be told to fail
#[derive(Clone, Default)]
pub struct RecordingCallbacks {
    fail: bool,
    pub delivered: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingCallbacks {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn deliveries(&self) -> Vec<(String, String)> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallbackSink for RecordingCallbacks {
    async fn deliver(&self, url: &str, message: &str) -> Result<(), DeliveryError> {
        self.delivered
            .lock()
            .unwrap()
            .push((url.to_string(), message.to_string()));
        if self.fail {
            Err(DeliveryError::Transport("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}
