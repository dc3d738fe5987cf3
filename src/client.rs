use std::{fmt, str::FromStr};

use reqwest::{header, Method, Url};
use serde::Serialize;
use serde_json::Value;
use tokio::time::sleep;

use crate::{
    decode::{decode_json, decode_logs, decode_tool_response, error_message},
    wire::{CallToolRequest, ExecuteRequest},
    ClientOptions, GatewayError, LogEntry, Provider, Result,
};

/// Default number of log entries requested by [`GatewayClient::logs`] callers
/// that have no preference.
pub const DEFAULT_LOG_LIMIT: usize = 100;

#[derive(Clone)]
/// HTTP client for the MCP Tool Gateway.
///
/// Cloning is cheap and shares the underlying connection pool.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    options: ClientOptions,
}

impl fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish()
    }
}

impl GatewayClient {
    /// Creates a client for the gateway at `base_url` with default options.
    ///
    /// A trailing `/` is ignored, so `http://localhost:8787/` and
    /// `http://localhost:8787` are equivalent.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim().trim_end_matches('/').to_owned(),
            options: ClientOptions::default(),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `GATEWAY_URL` — gateway base URL (required)
    /// - `GATEWAY_TIMEOUT_MS`, `GATEWAY_MAX_RETRIES`, `GATEWAY_RETRY_DELAY_MS`,
    ///   `GATEWAY_RETRY_BACKOFF` — optional overrides of [`ClientOptions`]
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mcp_tool_gateway::GatewayClient;
    ///
    /// let gateway = GatewayClient::from_env().expect("missing GATEWAY_URL");
    /// ```
    pub fn from_env() -> std::result::Result<Self, String> {
        let url = std::env::var("GATEWAY_URL")
            .map_err(|_| "missing GATEWAY_URL environment variable".to_owned())?;
        if url.trim().is_empty() {
            return Err("GATEWAY_URL is set but empty".to_owned());
        }

        let mut options = ClientOptions::default();
        if let Some(timeout_ms) = env_override("GATEWAY_TIMEOUT_MS")? {
            options.timeout_ms = timeout_ms;
        }
        if let Some(max_retries) = env_override("GATEWAY_MAX_RETRIES")? {
            options.max_retries = max_retries;
        }
        if let Some(retry_delay_ms) = env_override("GATEWAY_RETRY_DELAY_MS")? {
            options.retry_delay_ms = retry_delay_ms;
        }
        if let Some(retry_backoff) = env_override("GATEWAY_RETRY_BACKOFF")? {
            options.retry_backoff = retry_backoff;
        }

        Ok(Self::new(url).with_options(options))
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Lists the tools of an MCP server in `provider`'s schema format.
    ///
    /// Gemini answers `{"function_declarations": [...]}`; OpenAI and xAI answer
    /// `{"tools": [{"type": "function", "function": {...}}]}`. Without a
    /// `server` the gateway picks its default server.
    pub async fn get_tools(&self, provider: Provider, server: Option<&str>) -> Result<Value> {
        let query = server_query(server);
        let url = self.endpoint(&format!("/tools/{provider}"), &query)?;
        self.send_with_retry(Method::GET, url, None).await
    }

    /// Executes a tool call given in `provider`'s own call format.
    ///
    /// `call` is forwarded untouched, e.g. `{"name": "add", "args": {..}}` for
    /// Gemini or `{"name": "add", "arguments": "{..}"}` for OpenAI and xAI.
    /// Returns the `result` field of the gateway response.
    pub async fn execute(
        &self,
        provider: Provider,
        call: &Value,
        server: Option<&str>,
    ) -> Result<Value> {
        let payload = ExecuteRequest {
            provider,
            call,
            server: non_empty(server),
        };
        let url = self.endpoint("/execute", &[])?;
        let response = self.post(url, &payload).await?;
        decode_tool_response(response)
    }

    /// Invokes `tool` on `server` through the generic `/call_tool` endpoint.
    pub async fn call_tool(&self, server: &str, tool: &str, arguments: &Value) -> Result<Value> {
        let payload = CallToolRequest {
            server,
            tool,
            arguments,
        };
        let url = self.endpoint("/call_tool", &[])?;
        let response = self.post(url, &payload).await?;
        decode_tool_response(response)
    }

    /// Lists the raw MCP tool schemas of a server, without provider translation.
    pub async fn tools(&self, server: Option<&str>) -> Result<Value> {
        let query = server_query(server);
        let url = self.endpoint("/tools", &query)?;
        self.send_with_retry(Method::GET, url, None).await
    }

    /// Fetches up to `limit` execution log entries of `server`.
    ///
    /// `since` is an ISO 8601 timestamp; only newer entries are returned.
    pub async fn logs(
        &self,
        server: &str,
        limit: usize,
        since: Option<&str>,
    ) -> Result<Vec<LogEntry>> {
        let limit = limit.to_string();
        let mut query = vec![("server", server), ("limit", limit.as_str())];
        if let Some(since) = non_empty(since) {
            query.push(("since", since));
        }
        let url = self.endpoint("/logs", &query)?;
        let response = self.send_with_retry(Method::GET, url, None).await?;
        decode_logs(response)
    }

    /// Gateway health, typically `{"ok": true, "servers": [...]}`.
    pub async fn health(&self) -> Result<Value> {
        let url = self.endpoint("/health", &[])?;
        self.send_with_retry(Method::GET, url, None).await
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let raw = format!("{}{path}", self.base_url);
        let mut url =
            Url::parse(&raw).map_err(|err| GatewayError::InvalidUrl(format!("{raw}: {err}")))?;
        // An empty pair list would still leave a dangling `?`.
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn post<B: Serialize>(&self, url: Url, payload: &B) -> Result<Value> {
        let body = serde_json::to_vec(payload)
            .map_err(|err| GatewayError::Decode(format!("could not encode request body: {err}")))?;
        self.send_with_retry(Method::POST, url, Some(&body)).await
    }

    async fn send_with_retry(
        &self,
        method: Method,
        url: Url,
        body: Option<&[u8]>,
    ) -> Result<Value> {
        let mut attempt = 0usize;
        loop {
            #[cfg(feature = "tracing")]
            tracing::debug!("gateway {} {} (attempt {})", method, url, attempt + 1);

            let err = match self.send_once(method.clone(), url.clone(), body).await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => err,
            };

            if attempt >= self.options.max_retries {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "gateway {} {} failed after {} attempts: {}",
                    method,
                    url,
                    attempt + 1,
                    err
                );

                return Err(GatewayError::RetriesExhausted {
                    attempts: attempt + 1,
                    source: Box::new(err),
                });
            }

            self.wait_before_retry(attempt).await;
            attempt += 1;
        }
    }

    /// Performs a single request. Retryable failures come back as
    /// [`GatewayError::Transport`] or [`GatewayError::Server`].
    async fn send_once(&self, method: Method, url: Url, body: Option<&[u8]>) -> Result<Value> {
        let mut request = self
            .http
            .request(method, url)
            .timeout(self.options.timeout());
        if let Some(body) = body {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.to_vec());
        }

        let response = request.send().await.map_err(GatewayError::Transport)?;
        let status = response.status();

        if status.is_client_error() {
            // 4xx is terminal even when its body cannot be read.
            let body = response.bytes().await.unwrap_or_default();
            return Err(GatewayError::Http {
                status: status.as_u16(),
                message: error_message(status, &String::from_utf8_lossy(&body)),
            });
        }

        let body = response.bytes().await.map_err(GatewayError::Transport)?;
        if status.is_success() {
            return decode_json(&body);
        }

        Err(GatewayError::Server {
            status: status.as_u16(),
            message: error_message(status, &String::from_utf8_lossy(&body)),
        })
    }

    async fn wait_before_retry(&self, attempt: usize) {
        let delay = self.options.retry_delay(attempt);

        #[cfg(feature = "tracing")]
        tracing::debug!("retrying gateway request after {} ms", delay.as_millis());

        sleep(delay).await;
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn server_query(server: Option<&str>) -> Vec<(&'static str, &str)> {
    non_empty(server)
        .map(|server| vec![("server", server)])
        .unwrap_or_default()
}

fn env_override<T>(name: &str) -> std::result::Result<Option<T>, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|err| format!("invalid {name} value '{raw}': {err}")),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::{server_query, GatewayClient};

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let client = GatewayClient::new("http://localhost:8787/");
        assert_eq!(client.base_url(), "http://localhost:8787");
    }

    #[test]
    fn endpoint_without_query_has_no_question_mark() {
        let client = GatewayClient::new("http://localhost:8787");
        let url = client
            .endpoint("/tools/openai", &server_query(None))
            .expect("url must build");
        assert_eq!(url.as_str(), "http://localhost:8787/tools/openai");

        let url = client
            .endpoint("/tools", &server_query(Some("")))
            .expect("url must build");
        assert_eq!(url.as_str(), "http://localhost:8787/tools");
    }

    #[test]
    fn endpoint_appends_encoded_server() {
        let client = GatewayClient::new("http://localhost:8787");
        let url = client
            .endpoint("/tools/gemini", &server_query(Some("test-server")))
            .expect("url must build");
        assert_eq!(
            url.as_str(),
            "http://localhost:8787/tools/gemini?server=test-server"
        );

        let url = client
            .endpoint("/tools", &server_query(Some("my server&co")))
            .expect("url must build");
        assert_eq!(url.query(), Some("server=my+server%26co"));
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let client = GatewayClient::new("https://example.com/gateway");
        let url = client.endpoint("/health", &[]).expect("url must build");
        assert_eq!(url.as_str(), "https://example.com/gateway/health");
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let client = GatewayClient::new("not a url");
        assert!(client.endpoint("/health", &[]).is_err());
    }

    #[test]
    fn debug_lists_base_url_and_options() {
        let client = GatewayClient::new("http://localhost:8787");
        let debug = format!("{client:?}");
        assert!(debug.contains("http://localhost:8787"));
        assert!(debug.contains("max_retries: 3"));
    }
}
