//! Profile extraction: renders the transcript into an extraction prompt and
//! decodes the model's JSON reply into a [`UserProfile`].

use color_eyre::Result;
use sal_domain::{conversation::ChatMessage, profile::UserProfile};
use serde_json::Value;

const EXTRACTION_SYSTEM_PROMPT: &str =
	"Extract user info for coding. Return only a JSON object as requested.";
const EXTRACTION_INSTRUCTIONS: &str = "Extract only the following user information as a JSON \
	object from the conversation below.
Do NOT add any text, explanations, or comments. Only output a JSON object with these keys:
'first_name', 'last_name', 'id_number', 'gender', 'age', 'hmo_name', 'hmo_card_number', \
	'membership_tier'.

If a field is missing, use an empty string. Conversation:
";

/// Builds the two-message extraction request from a conversation transcript.
pub fn extraction_messages(history: &[ChatMessage]) -> Vec<Value> {
	let mut prompt = EXTRACTION_INSTRUCTIONS.to_string();

	for message in history {
		let prefix = if message.role == sal_domain::conversation::Role::User {
			"User:"
		} else {
			"Bot:"
		};

		prompt.push_str(&format!("{prefix} {}\n", message.content));
	}

	vec![
		serde_json::json!({ "role": "system", "content": EXTRACTION_SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": prompt }),
	]
}

/// Extracts a profile from the transcript. A reply that fails to decode
/// yields an empty profile rather than an error; only transport failures
/// propagate.
pub async fn extract(
	cfg: &sal_config::LlmProviderConfig,
	history: &[ChatMessage],
) -> Result<UserProfile> {
	let messages = extraction_messages(history);
	let reply = crate::completion::complete(cfg, &messages).await?;

	Ok(UserProfile::decode_extraction(reply.trim()).unwrap_or_default())
}
