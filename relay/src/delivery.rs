//! Out-of-band delivery to the caller's response URL.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Invalid callback URL: {0}")]
    InvalidUrl(String),

    #[error("Callback transport failed: {0}")]
    Transport(String),
}

#[derive(Serialize)]
struct CallbackMessage<'a> {
    message: &'a str,
}

/// Posts a finished answer to a callback URL.
///
/// Only transport failures are errors; the response status is not inspected.
#[async_trait]
pub trait CallbackSink: Send + Sync {
    async fn deliver(&self, url: &str, message: &str) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpCallbackSink {
    client: Client,
}

impl HttpCallbackSink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CallbackSink for HttpCallbackSink {
    async fn deliver(&self, url: &str, message: &str) -> Result<(), DeliveryError> {
        let target = reqwest::Url::parse(url).map_err(|e| DeliveryError::InvalidUrl(e.to_string()))?;
        if !matches!(target.scheme(), "http" | "https") {
            return Err(DeliveryError::InvalidUrl(format!(
                "unsupported scheme: {}",
                target.scheme()
            )));
        }

        let response = self
            .client
            .post(target)
            .json(&CallbackMessage { message })
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "Callback accepted");
        } else {
            warn!(status = status.as_u16(), "Callback answered with a non-success status");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_posts_message_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/1/channel/send")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::JsonString(r#"{"message":"hello chat"}"#.to_string()))
            .with_status(200)
            .create_async()
            .await;

        let url = format!("{}/1/channel/send", server.url());
        HttpCallbackSink::new().deliver(&url, "hello chat").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/send")
            .with_status(500)
            .create_async()
            .await;

        let url = format!("{}/send", server.url());
        assert!(HttpCallbackSink::new().deliver(&url, "x").await.is_ok());
    }

    #[tokio::test]
    async fn test_bad_urls_are_rejected() {
        let sink = HttpCallbackSink::new();
        assert!(matches!(
            sink.deliver("not a url", "x").await,
            Err(DeliveryError::InvalidUrl(_))
        ));
        assert!(matches!(
            sink.deliver("ftp://example.com/x", "x").await,
            Err(DeliveryError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = HttpCallbackSink::new()
            .deliver(&format!("http://{}/send", addr), "x")
            .await;
        assert!(matches!(result, Err(DeliveryError::Transport(_))));
    }
}
