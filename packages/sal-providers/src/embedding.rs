use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

/// Embeds a batch of texts, returning one vector per input in input order.
pub async fn embed(
	cfg: &sal_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;
	let vectors = decode_embeddings(json)?;

	if vectors.len() != texts.len() {
		return Err(eyre::eyre!(
			"Got {} embeddings back for {} input texts.",
			vectors.len(),
			texts.len()
		));
	}

	Ok(vectors)
}

// Entries may arrive out of order; each carries an `index` slot that restores
// input order. A missing slot falls back to the entry's position.
fn decode_embeddings(json: Value) -> Result<Vec<Vec<f32>>> {
	let entries = json
		.get("data")
		.and_then(Value::as_array)
		.ok_or_else(|| eyre::eyre!("Embedding response has no data array."))?;
	let mut rows: Vec<(usize, Vec<f32>)> = Vec::with_capacity(entries.len());

	for (position, entry) in entries.iter().enumerate() {
		let slot =
			entry.get("index").and_then(Value::as_u64).map(|v| v as usize).unwrap_or(position);
		let values = entry
			.get("embedding")
			.and_then(Value::as_array)
			.ok_or_else(|| eyre::eyre!("Embedding entry has no embedding array."))?;
		let mut row = Vec::with_capacity(values.len());

		for value in values {
			row.push(
				value.as_f64().ok_or_else(|| eyre::eyre!("Non-numeric embedding value."))? as f32,
			);
		}

		rows.push((slot, row));
	}

	rows.sort_by_key(|(slot, _)| *slot);

	Ok(rows.into_iter().map(|(_, row)| row).collect())
}
