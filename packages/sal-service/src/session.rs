//! The two-phase conversation controller. One [`Session`] holds a single
//! user's transcript, phase and confirmed profile.

use serde::{Deserialize, Serialize};

use sal_domain::{
	conversation::{ChatMessage, Phase, user_just_confirmed},
	profile::UserProfile,
};
use sal_storage::models::BenefitRecord;

use crate::{ChatRequest, ExtractRequest, SalService};

/// Fixed acknowledgement sent when the identity details are confirmed.
pub const CONFIRMATION_ACK: &str =
	"תודה! הפרטים נקלטו בהצלחה. כעת אפשר לשאול שאלות על ההטבות והכיסויים במסלול שלך.";

/// Debug view of the last answering turn's retrieval.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RetrievalSnapshot {
	pub rag_query: String,
	pub namespace: String,
	pub maslul: String,
	pub retrieved_docs: Vec<BenefitRecord>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Session {
	pub history: Vec<ChatMessage>,
	pub phase: Phase,
	pub user_data: UserProfile,
	pub last_retrieval: Option<RetrievalSnapshot>,
}

impl Session {
	pub fn reset(&mut self) {
		*self = Self::default();
	}
}

impl SalService {
	/// Advances the session by one user turn and returns the assistant
	/// reply. A confirmation while collecting identity triggers profile
	/// extraction, flips the phase exactly once and answers with the fixed
	/// acknowledgement; every other turn goes through [`SalService::chat`].
	pub async fn handle_turn(&self, session: &mut Session, text: &str) -> String {
		session.history.push(ChatMessage::user(text));

		if session.phase == Phase::CollectingIdentity && user_just_confirmed(&session.history) {
			let request = ExtractRequest { history: session.history.clone() };

			session.user_data = match self.extract_user_data(&request).await {
				Ok(response) => response.user_data,
				Err(err) => {
					tracing::warn!(
						error = %err,
						"Profile extraction failed; continuing with an empty profile."
					);

					UserProfile::default()
				},
			};
			session.phase = Phase::AnsweringQuestions;
			session.last_retrieval = None;

			session.history.push(ChatMessage::assistant(CONFIRMATION_ACK));

			return CONFIRMATION_ACK.to_string();
		}

		let request = ChatRequest {
			history: session.history.clone(),
			phase: session.phase,
			user_data: session.user_data.clone(),
		};
		let response = self.chat(&request).await;

		session.history.push(ChatMessage::assistant(response.answer.clone()));

		session.last_retrieval = Some(RetrievalSnapshot {
			rag_query: response.rag_query,
			namespace: response.namespace,
			maslul: response.maslul,
			retrieved_docs: response.retrieved_docs,
		});

		response.answer
	}
}
