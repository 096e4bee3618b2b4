//! The user identity record and its best-effort extraction decoder.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity record extracted from the conversation transcript. Missing
/// fields stay empty; each extraction replaces the prior profile wholesale.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
	pub first_name: String,
	pub last_name: String,
	pub id_number: String,
	pub gender: String,
	pub age: String,
	pub hmo_name: String,
	pub hmo_card_number: String,
	pub membership_tier: String,
}

impl UserProfile {
	pub fn is_empty(&self) -> bool {
		[
			&self.first_name,
			&self.last_name,
			&self.id_number,
			&self.gender,
			&self.age,
			&self.hmo_name,
			&self.hmo_card_number,
			&self.membership_tier,
		]
		.iter()
		.all(|field| field.is_empty())
	}

	/// Decodes the literal mapping an LLM returns for a profile-extraction
	/// request. Code fences are stripped first; only the eight known keys are
	/// read and anything else is discarded. Any parse failure yields `None`;
	/// the model output is untrusted and must never error past this boundary.
	pub fn decode_extraction(raw: &str) -> Option<Self> {
		let stripped = strip_code_fences(raw);
		let value: Value = serde_json::from_str(stripped).ok()?;
		let map = value.as_object()?;

		Some(Self {
			first_name: string_field(map, "first_name"),
			last_name: string_field(map, "last_name"),
			id_number: string_field(map, "id_number"),
			gender: string_field(map, "gender"),
			age: string_field(map, "age"),
			hmo_name: string_field(map, "hmo_name"),
			hmo_card_number: string_field(map, "hmo_card_number"),
			membership_tier: string_field(map, "membership_tier"),
		})
	}
}

fn string_field(map: &Map<String, Value>, key: &str) -> String {
	match map.get(key) {
		Some(Value::String(text)) => text.trim().to_string(),
		// Models regularly return age and card numbers as bare numbers.
		Some(Value::Number(number)) => number.to_string(),
		_ => String::new(),
	}
}

fn strip_code_fences(raw: &str) -> &str {
	let mut text = raw.trim();

	for prefix in ["```json", "```python", "```"] {
		if let Some(rest) = text.strip_prefix(prefix) {
			text = rest;

			break;
		}
	}
	if let Some(rest) = text.strip_suffix("```") {
		text = rest;
	}

	text.trim()
}
