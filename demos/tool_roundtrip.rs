use mcp_tool_gateway::{GatewayClient, Provider, DEFAULT_LOG_LIMIT};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let gateway = GatewayClient::from_env().map_err(anyhow::Error::msg)?;

    let health = gateway.health().await?;
    println!("health: {health}");

    let tools = gateway.get_tools(Provider::OpenAi, Some("default")).await?;
    if let Some(list) = tools["tools"].as_array() {
        for tool in list {
            println!("tool: {}", tool["function"]["name"]);
        }
    }

    let result = gateway
        .execute(
            Provider::OpenAi,
            &json!({"name": "add", "arguments": "{\"a\": 15, \"b\": 27}"}),
            Some("default"),
        )
        .await?;
    println!("add(15, 27) = {result}");

    for entry in gateway.logs("default", DEFAULT_LOG_LIMIT, None).await? {
        println!("{} {} -> {:?}", entry.timestamp, entry.tool, entry.result);
    }

    Ok(())
}
