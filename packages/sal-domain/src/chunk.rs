//! Knowledge-base chunks parsed from a benefits page.

use serde::{Deserialize, Serialize};

use crate::contacts::ContactInfo;

/// One unit of knowledge-base content. Chunks are immutable once created;
/// their lifecycle ends at upsert into the vector store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "chunk_type", rename_all = "lowercase")]
pub enum Chunk {
	Intro { text: String },
	Service(ServiceChunk),
	Outro { text: String },
}

/// A single (service, HMO, tier) benefit entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceChunk {
	pub kupa: String,
	pub maslul: String,
	/// Service name, with the page's intro title appended for retrieval
	/// recall unless already a substring.
	pub service: String,
	pub benefit: String,
	/// The page's intro text, carried for grounding context.
	pub intro: String,
	#[serde(default)]
	pub kupa_contacts: ContactInfo,
}

impl Chunk {
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Intro { .. } => "intro",
			Self::Service(_) => "service",
			Self::Outro { .. } => "outro",
		}
	}
}
