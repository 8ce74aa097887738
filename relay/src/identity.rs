//! Caller and channel metadata from Nightbot's form-encoded headers.

use crate::request::{InboundRequest, CHANNEL_HEADER, USER_HEADER};
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_DISPLAY_NAME: &str = "Friend";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub display_name: String,
    pub provider: Option<String>,
}

impl Default for CallerIdentity {
    fn default() -> Self {
        Self {
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            provider: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub name: String,
    pub provider: Option<String>,
}

fn decode_header(request: &InboundRequest, header: &str) -> Option<HashMap<String, String>> {
    let raw = request.header(header)?;
    match serde_urlencoded::from_str::<HashMap<String, String>>(raw) {
        Ok(fields) => Some(fields),
        Err(e) => {
            debug!(header, error = %e, "Could not decode metadata header");
            None
        }
    }
}

fn non_blank(fields: &HashMap<String, String>, key: &str) -> Option<String> {
    fields
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Who asked. Never fails: anything unusable yields the default identity.
pub fn extract_identity(request: &InboundRequest) -> CallerIdentity {
    let Some(fields) = decode_header(request, USER_HEADER) else {
        return CallerIdentity::default();
    };

    match non_blank(&fields, "name") {
        Some(display_name) => CallerIdentity {
            display_name,
            provider: non_blank(&fields, "provider"),
        },
        None => CallerIdentity::default(),
    }
}

/// Which channel the command came from, when the header is present
pub fn extract_channel(request: &InboundRequest) -> Option<ChannelInfo> {
    let fields = decode_header(request, CHANNEL_HEADER)?;
    Some(ChannelInfo {
        name: non_blank(&fields, "name")?,
        provider: non_blank(&fields, "provider"),
    })
}
