//! Conversation transcript types and the two-phase transition predicate.

use serde::{Deserialize, Serialize};

/// Affirmations recognized as a confirmation, in Hebrew and English.
pub const CONFIRMATION_TOKENS: [&str; 10] = [
	"אכן",
	"אמת",
	"כן",
	"מאשר",
	"אישרתי",
	"אישור",
	"sure",
	"yes",
	"correct",
	"confirmed",
];

/// Phrases an assistant message must contain to count as a confirmation
/// request.
pub const CONFIRMATION_REQUESTS: [&str; 6] = [
	"האם כל הפרטים נכונים",
	"האם המידע נכון",
	"אנא אשר",
	"please confirm",
	"are these details correct",
	"confirm",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	User,
	Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
	pub role: Role,
	pub content: String,
}

impl ChatMessage {
	pub fn user(content: impl Into<String>) -> Self {
		Self { role: Role::User, content: content.into() }
	}

	pub fn assistant(content: impl Into<String>) -> Self {
		Self { role: Role::Assistant, content: content.into() }
	}
}

/// Conversation phase. The session starts collecting identity details and
/// moves to answering questions exactly once, on a confirmed profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
	#[default]
	CollectingIdentity,
	AnsweringQuestions,
}

pub fn assistant_requested_confirmation(content: &str) -> bool {
	CONFIRMATION_REQUESTS.iter().any(|phrase| content.contains(phrase))
}

/// True when the last message is a user confirmation AND the nearest earlier
/// assistant message asked for one. Both conditions are required: a stray
/// "כן" with no preceding confirmation request never counts.
///
/// Known limitation: fixed keyword lists on both sides will miss rephrased
/// confirmations and can false-positive on unrelated uses of the same words.
pub fn user_just_confirmed(history: &[ChatMessage]) -> bool {
	if history.len() < 2 {
		return false;
	}
	let Some(last) = history.last() else {
		return false;
	};
	if last.role != Role::User {
		return false;
	}

	let lowered = last.content.to_lowercase();

	if !CONFIRMATION_TOKENS.iter().any(|token| lowered.contains(token)) {
		return false;
	}

	history[..history.len() - 1]
		.iter()
		.rev()
		.find(|message| message.role == Role::Assistant)
		.map(|message| assistant_requested_confirmation(&message.content))
		.unwrap_or(false)
}
