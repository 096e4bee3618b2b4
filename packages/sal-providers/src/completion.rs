use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

/// Sends one chat-completion request and returns the assistant's reply text.
pub async fn complete(cfg: &sal_config::LlmProviderConfig, messages: &[Value]) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"max_tokens": cfg.max_tokens,
		"messages": messages,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	reply_content(&json)
		.map(str::to_string)
		.ok_or_else(|| eyre::eyre!("Completion response is missing message content."))
}

fn reply_content(json: &Value) -> Option<&str> {
	json.get("choices")?
		.as_array()?
		.first()?
		.get("message")?
		.get("content")?
		.as_str()
}
