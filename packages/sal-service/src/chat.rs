//! The chat operation: identity collection in the first phase, retrieval
//! augmented answering in the second.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sal_domain::{
	conversation::{ChatMessage, Phase, Role},
	hmo,
	profile::UserProfile,
};
use sal_storage::models::BenefitRecord;

use crate::SalService;

pub const IDENTITY_SYSTEM_PROMPT: &str = "You are a helpful assistant for health fund services \
	in Israel. Before answering any service-related questions, you must verify the user's \
	identity by collecting the following details through a natural, step-by-step conversation \
	(not a form):\n- Full name (first and last)\n- ID number (9 digits)\n- Gender\n- Age \
	(0-120)\n- HMO name (מכבי | מאוחדת | כללית)\n- HMO card number (9 digits)\n- Insurance \
	membership tier (זהב | כסף | ארד)\nAfter collecting all details, summarize the information \
	and ask the user for confirmation. Do not answer any service-related questions until the \
	identity has been confirmed.";

pub const QA_SYSTEM_PROMPT: &str = "You are an expert assistant for Israeli HMO (health-fund) \
	services. Rely ONLY on the retrieved knowledge-base snippets and the user-provided profile \
	to answer. If the answer is not found in those snippets, reply clearly that you don't have \
	the information.\n\nAlways reply in the same language as the user's question (Hebrew or \
	English). If a question cannot be answered from the data, say so clearly. When relevant, \
	add the HMO's phone and website at the end:\nטלפון:\nלקישור לחץ [כאן>>](URL)";

/// Returned whenever a provider call fails mid-turn. The conversation keeps
/// going; the failure is logged server-side.
pub const GENERIC_ERROR_REPLY: &str = "Internal server error. Please try again later.";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChatRequest {
	#[serde(default)]
	pub history: Vec<ChatMessage>,
	#[serde(default)]
	pub phase: Phase,
	#[serde(default)]
	pub user_data: UserProfile,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatResponse {
	pub answer: String,
	/// Echoed retrieval inputs and outputs, for client-side debug panes.
	pub retrieved_docs: Vec<BenefitRecord>,
	pub namespace: String,
	pub maslul: String,
	pub rag_query: String,
}

impl SalService {
	/// Runs one chat turn. Retrieval happens only in the answering phase and
	/// only once a profile exists; any provider failure degrades to
	/// [`GENERIC_ERROR_REPLY`] instead of an error.
	pub async fn chat(&self, request: &ChatRequest) -> ChatResponse {
		let mut retrieved_docs = Vec::new();
		let mut namespace = String::new();
		let mut maslul = String::new();
		let mut rag_query = String::new();

		if request.phase == Phase::AnsweringQuestions && !request.user_data.is_empty() {
			namespace = hmo::namespace_for(&request.user_data.hmo_name).to_string();
			maslul = request.user_data.membership_tier.clone();
			rag_query = last_user_message(&request.history).unwrap_or_default().to_string();

			let preview: String = rag_query.chars().take(80).collect();

			tracing::info!(%namespace, %maslul, query = %preview, "Retrieving benefit snippets.");

			match self.retrieve(&namespace, &rag_query, &maslul).await {
				Ok(docs) => retrieved_docs = docs,
				Err(err) => {
					tracing::error!(error = %err, "Retrieval failed.");

					return ChatResponse {
						answer: GENERIC_ERROR_REPLY.to_string(),
						retrieved_docs,
						namespace,
						maslul,
						rag_query,
					};
				},
			}
		}

		let context = build_context(&retrieved_docs);
		let messages = completion_messages(&request.history, request.phase, context.as_deref());
		let answer =
			match self.providers.completion.complete(&self.cfg.providers.chat, &messages).await {
				Ok(reply) => reply.trim().to_string(),
				Err(err) => {
					tracing::error!(error = %err, "Chat completion failed.");

					GENERIC_ERROR_REPLY.to_string()
				},
			};

		ChatResponse { answer, retrieved_docs, namespace, maslul, rag_query }
	}

	async fn retrieve(
		&self,
		namespace: &str,
		query: &str,
		maslul: &str,
	) -> crate::ServiceResult<Vec<BenefitRecord>> {
		let vector = self.embed_one(query).await?;
		// An empty tier means an unfiltered namespace query.
		let tier = (!maslul.is_empty()).then_some(maslul);
		let docs = self.index.query(namespace, vector, tier, self.cfg.retrieval.top_k).await?;

		Ok(docs)
	}
}

fn last_user_message(history: &[ChatMessage]) -> Option<&str> {
	history
		.iter()
		.rev()
		.find(|message| message.role == Role::User)
		.map(|message| message.content.as_str())
}

/// Renders retrieved records into the Hebrew context block handed to the
/// model. Empty retrieval yields no block at all.
fn build_context(docs: &[BenefitRecord]) -> Option<String> {
	if docs.is_empty() {
		return None;
	}

	let mut body = String::new();

	for doc in docs {
		let intro = doc.intro.trim();

		if !intro.is_empty() {
			body.push_str(&format!("\nרקע: {intro}\n"));
		}

		body.push_str(&format!("● {} - {}\n", doc.service, doc.benefit));

		if !doc.phones.is_empty() {
			body.push_str(&format!("טלפון: {}\n", doc.phones));
		}
		if !doc.links.is_empty() {
			body.push_str(&format!("[לקישור לחץ כאן>>]({})\n", doc.links));
		}
	}

	Some(format!("\nמידע רלוונטי מהידע שנשאב (RAG):\n{body}\n"))
}

/// System prompt first, then the transcript. When a context block exists it
/// is inserted as an assistant message immediately before the most recent
/// user message, so the model reads it right next to the question.
fn completion_messages(history: &[ChatMessage], phase: Phase, context: Option<&str>) -> Vec<Value> {
	let system = match phase {
		Phase::CollectingIdentity => IDENTITY_SYSTEM_PROMPT,
		Phase::AnsweringQuestions => QA_SYSTEM_PROMPT,
	};
	let mut messages = vec![serde_json::json!({ "role": "system", "content": system })];
	let splice_at =
		context.and_then(|_| history.iter().rposition(|message| message.role == Role::User));

	for (position, message) in history.iter().enumerate() {
		if Some(position) == splice_at
			&& let Some(context) = context
		{
			messages.push(serde_json::json!({ "role": "assistant", "content": context }));
		}

		messages.push(serde_json::json!({ "role": message.role, "content": message.content }));
	}

	messages
}
