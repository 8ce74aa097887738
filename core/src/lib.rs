// Core Gemini API functionality shared by the relay daemon and the
// diagnostics CLI:
// - API client for the generateContent and models endpoints
// - Request/response data structures
// - Provider configuration
// - Shared error types

// Export client module - API client for Gemini
pub mod client;
pub use client::*;

// Export types module - Request/response data structures
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;
