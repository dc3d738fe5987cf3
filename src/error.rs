/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Network or request execution error from `reqwest`.
    #[error("network error: {0}")]
    Transport(reqwest::Error),
    /// Client error (4xx) reported by the gateway. Never retried.
    #[error("Gateway HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// Server error (5xx or other non-success status). Retried.
    #[error("Gateway HTTP {status}: {message}")]
    Server { status: u16, message: String },
    /// All attempts failed with retryable errors; `source` is the last one.
    #[error("request failed after {attempts} attempts")]
    RetriesExhausted {
        attempts: usize,
        #[source]
        source: Box<GatewayError>,
    },
    /// The gateway answered but the tool call itself failed downstream.
    #[error("{0}")]
    Tool(String),
    /// Response decoding or shape validation error.
    #[error("decode error: {0}")]
    Decode(String),
    /// Base URL and endpoint path did not form a valid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl GatewayError {
    /// HTTP status attached to this error, looking through exhausted retries.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::RetriesExhausted { source, .. } => source.status(),
            _ => None,
        }
    }

    pub(crate) fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Server { .. })
    }
}
