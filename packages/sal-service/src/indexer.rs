//! Indexing of parsed chunks into the vector store.

use serde::Serialize;

use sal_domain::{chunk::Chunk, hmo};
use sal_storage::models::BenefitRecord;

use crate::{SalService, ServiceResult};

#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct IndexReport {
	pub upserted: u32,
	pub failed: u32,
}

impl SalService {
	/// Indexes a parsed page. A failing chunk is logged and counted; the
	/// batch always runs to completion.
	pub async fn index_chunks(&self, chunks: &[Chunk]) -> IndexReport {
		let mut report = IndexReport::default();

		for (position, chunk) in chunks.iter().enumerate() {
			match self.index_chunk(position, chunk).await {
				Ok(()) => report.upserted += 1,
				Err(err) => {
					tracing::warn!(
						error = %err,
						position,
						chunk_type = chunk.kind(),
						"Chunk indexing failed."
					);

					report.failed += 1;
				},
			}
		}

		report
	}

	/// Service chunks embed only `"{service} - {benefit}"`; contact details
	/// ride along as payload. Intro and outro chunks embed their full text
	/// under a fixed suffix, so re-indexing a page overwrites them in place.
	async fn index_chunk(&self, position: usize, chunk: &Chunk) -> ServiceResult<()> {
		match chunk {
			Chunk::Service(service) => {
				let namespace = hmo::namespace_for(&service.kupa);
				let embed_text = format!("{} - {}", service.service, service.benefit);
				let vector = self.embed_one(&embed_text).await?;
				let record = BenefitRecord {
					chunk_type: "service".to_string(),
					kupa: service.kupa.clone(),
					maslul: service.maslul.clone(),
					service: service.service.clone(),
					benefit: service.benefit.clone(),
					phones: service.kupa_contacts.phones.join(", "),
					links: service.kupa_contacts.links.join(", "),
					intro: service.intro.clone(),
				};

				self.index.upsert(namespace, &position.to_string(), vector, &record).await?;
			},
			Chunk::Intro { text } | Chunk::Outro { text } => {
				let vector = self.embed_one(text).await?;
				let record = BenefitRecord {
					chunk_type: chunk.kind().to_string(),
					..Default::default()
				};

				self.index.upsert(hmo::FALLBACK_NAMESPACE, chunk.kind(), vector, &record).await?;
			},
		}

		Ok(())
	}
}
