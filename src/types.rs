use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tool-calling convention the gateway translates to and from MCP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// `{"function_declarations": [...]}` schemas, `{"name", "args"}` calls.
    Gemini,
    /// `{"tools": [{"type": "function", ...}]}` schemas, JSON-string arguments.
    #[serde(rename = "openai")]
    OpenAi,
    /// Same wire shape as OpenAI.
    Xai,
}

impl Provider {
    /// Name used in gateway paths and payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Xai => "xai",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            "xai" => Ok(Self::Xai),
            other => Err(format!("unknown provider '{other}'")),
        }
    }
}

/// One tool execution recorded by the gateway.
///
/// Missing fields decode to their defaults and unknown fields land in
/// `extra`, so a single odd entry never fails the whole listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 timestamp of the call.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub tool: String,
    #[serde(default)]
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure reported by the tool, usually a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
