//! Inbound chat-command requests and query extraction.

use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Caller metadata, `name=...&displayName=...&provider=...`
pub const USER_HEADER: &str = "nightbot-user";
/// Channel metadata, same encoding as the user header
pub const CHANNEL_HEADER: &str = "nightbot-channel";
/// Where the answer should be POSTed when the caller cannot wait
pub const RESPONSE_URL_HEADER: &str = "nightbot-response-url";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One invocation as handed over by the host.
///
/// Header names are stored lowercased so lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    headers: HashMap<String, String>,
    pub body: Option<String>,
    pub query_params: HashMap<String, String>,
}

impl InboundRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HashMap::new(),
            body: None,
            query_params: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    pub fn insert_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Trimmed query text; empty when none was supplied.
    ///
    /// A POST body's `query` field wins over the `q` and `query` parameters.
    /// A body that is not JSON, or whose `query` is missing or not a string,
    /// counts as absent rather than as an error.
    pub fn extract_query(&self) -> String {
        if let Some(query) = self.body_query() {
            return query;
        }

        ["q", "query"]
            .iter()
            .filter_map(|name| self.query_params.get(*name))
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .unwrap_or_default()
            .to_string()
    }

    fn body_query(&self) -> Option<String> {
        if self.method != Method::Post {
            return None;
        }
        let body = self.body.as_deref().filter(|body| !body.trim().is_empty())?;

        let value = match serde_json::from_str::<Value>(body) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "Ignoring request body that is not valid JSON");
                return None;
            }
        };

        // Only an object carries a `query` field; arrays and scalars count as no body.
        let query = value.as_object()?.get("query")?.as_str()?.trim();
        Some(query.to_string()).filter(|query| !query.is_empty())
    }

    /// Callback target, when the caller supplied one
    pub fn callback_url(&self) -> Option<&str> {
        self.header(RESPONSE_URL_HEADER)
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
