//! `mcp-tool-gateway` is an async HTTP client for the MCP Tool Gateway.
//!
//! The gateway exposes MCP tool servers to Gemini, OpenAI and xAI in their own
//! tool-calling formats. This crate wraps its endpoints:
//! - [`GatewayClient::get_tools`] and [`GatewayClient::tools`]
//! - [`GatewayClient::execute`] and [`GatewayClient::call_tool`]
//! - [`GatewayClient::logs`]
//! - [`GatewayClient::health`]
//!
//! Server errors and network failures are retried with exponential backoff
//! as configured by [`ClientOptions`]; client errors (4xx) fail immediately.

mod client;
mod decode;
mod error;
mod options;
mod types;
mod wire;

pub use client::{GatewayClient, DEFAULT_LOG_LIMIT};
pub use error::GatewayError;
pub use options::ClientOptions;
pub use types::{LogEntry, Provider};

pub type Result<T> = std::result::Result<T, GatewayError>;
