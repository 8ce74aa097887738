//! Relays chat-bot commands (Nightbot `$(urlfetch)` calls) to Gemini and
//! shapes the answer so it fits in a chat message.

pub mod config;
pub mod delivery;
pub mod error;
pub mod http_server;
pub mod identity;
pub mod logging;
pub mod outcome;
pub mod prompt;
pub mod provider;
pub mod relay;
pub mod request;
pub mod shaping;

pub use config::RelayConfig;
pub use outcome::{Outcome, ShapedResponse};
pub use relay::Relay;
pub use request::{InboundRequest, Method};
