use serde::Serialize;
use serde_json::Value;

use crate::Provider;

#[derive(Debug, Serialize)]
pub struct ExecuteRequest<'a> {
    pub provider: Provider,
    pub call: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct CallToolRequest<'a> {
    pub server: &'a str,
    pub tool: &'a str,
    pub arguments: &'a Value,
}
