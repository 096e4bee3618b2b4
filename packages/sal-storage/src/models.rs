//! The payload record stored alongside every benefit vector.

use std::collections::HashMap;

use qdrant_client::{
	client::Payload,
	qdrant::{Value, value::Kind},
};
use serde::{Deserialize, Serialize};

/// Flat string payload for one indexed chunk. Intro and outro records carry
/// only `chunk_type`; service records fill every field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenefitRecord {
	pub chunk_type: String,
	pub kupa: String,
	pub maslul: String,
	pub service: String,
	pub benefit: String,
	pub phones: String,
	pub links: String,
	pub intro: String,
}

impl BenefitRecord {
	pub fn to_payload(&self) -> Payload {
		Payload::from(self.payload_map())
	}

	fn payload_map(&self) -> HashMap<String, Value> {
		let mut map = HashMap::new();

		map.insert("chunk_type".to_string(), Value::from(self.chunk_type.clone()));
		map.insert("kupa".to_string(), Value::from(self.kupa.clone()));
		map.insert("maslul".to_string(), Value::from(self.maslul.clone()));
		map.insert("service".to_string(), Value::from(self.service.clone()));
		map.insert("benefit".to_string(), Value::from(self.benefit.clone()));
		map.insert("phones".to_string(), Value::from(self.phones.clone()));
		map.insert("links".to_string(), Value::from(self.links.clone()));
		map.insert("intro".to_string(), Value::from(self.intro.clone()));

		map
	}

	/// Missing or non-string payload fields read back as empty strings.
	pub fn from_payload(payload: &HashMap<String, Value>) -> Self {
		Self {
			chunk_type: payload_str(payload, "chunk_type"),
			kupa: payload_str(payload, "kupa"),
			maslul: payload_str(payload, "maslul"),
			service: payload_str(payload, "service"),
			benefit: payload_str(payload, "benefit"),
			phones: payload_str(payload, "phones"),
			links: payload_str(payload, "links"),
			intro: payload_str(payload, "intro"),
		}
	}
}

fn payload_str(payload: &HashMap<String, Value>, key: &str) -> String {
	match payload.get(key).and_then(|value| value.kind.as_ref()) {
		Some(Kind::StringValue(text)) => text.clone(),
		_ => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn payload_round_trips() {
		let record = BenefitRecord {
			chunk_type: "service".to_string(),
			kupa: "מכבי".to_string(),
			maslul: "זהב".to_string(),
			service: "פיזיותרפיה".to_string(),
			benefit: "80% הנחה".to_string(),
			phones: "*3555".to_string(),
			links: "https://www.maccabi4u.co.il".to_string(),
			intro: "רקע".to_string(),
		};
		let payload = record.payload_map();

		assert_eq!(BenefitRecord::from_payload(&payload), record);
	}

	#[test]
	fn missing_fields_read_as_empty() {
		let mut payload = HashMap::new();

		payload.insert("chunk_type".to_string(), Value::from("intro".to_string()));

		let record = BenefitRecord::from_payload(&payload);

		assert_eq!(record.chunk_type, "intro");
		assert_eq!(record.kupa, "");
		assert_eq!(record.benefit, "");
	}
}
