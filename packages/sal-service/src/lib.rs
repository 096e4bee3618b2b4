//! Service layer: two-phase chat, profile extraction and chunk indexing over
//! swappable provider and vector-index seams.

pub mod chat;
pub mod extract;
pub mod indexer;
pub mod session;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

pub use chat::{ChatRequest, ChatResponse, GENERIC_ERROR_REPLY};
pub use extract::{ExtractRequest, ExtractResponse};
pub use indexer::IndexReport;
pub use session::{CONFIRMATION_ACK, RetrievalSnapshot, Session};

use sal_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use sal_domain::{conversation::ChatMessage, profile::UserProfile};
use sal_providers::{completion, embedding, extractor};
use sal_storage::{models::BenefitRecord, qdrant::QdrantStore};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

pub trait ExtractorProvider
where
	Self: Send + Sync,
{
	fn extract<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		history: &'a [ChatMessage],
	) -> BoxFuture<'a, color_eyre::Result<UserProfile>>;
}

/// Vector-store seam. The production implementation is [`QdrantStore`];
/// tests substitute an in-memory index.
pub trait VectorIndex
where
	Self: Send + Sync,
{
	fn upsert<'a>(
		&'a self,
		namespace: &'a str,
		id_suffix: &'a str,
		vector: Vec<f32>,
		record: &'a BenefitRecord,
	) -> BoxFuture<'a, sal_storage::Result<()>>;

	fn query<'a>(
		&'a self,
		namespace: &'a str,
		vector: Vec<f32>,
		maslul: Option<&'a str>,
		top_k: u32,
	) -> BoxFuture<'a, sal_storage::Result<Vec<BenefitRecord>>>;
}

#[derive(Debug)]
pub enum ServiceError {
	Provider { message: String },
	Index { message: String },
}

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Provider { message } => write!(f, "Provider error: {message}"),
			Self::Index { message } => write!(f, "Index error: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<color_eyre::Report> for ServiceError {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<sal_storage::Error> for ServiceError {
	fn from(err: sal_storage::Error) -> Self {
		Self::Index { message: err.to_string() }
	}
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub completion: Arc<dyn CompletionProvider>,
	pub extractor: Arc<dyn ExtractorProvider>,
}

impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		completion: Arc<dyn CompletionProvider>,
		extractor: Arc<dyn ExtractorProvider>,
	) -> Self {
		Self { embedding, completion, extractor }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), completion: provider.clone(), extractor: provider }
	}
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl CompletionProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(completion::complete(cfg, messages))
	}
}

impl ExtractorProvider for DefaultProviders {
	fn extract<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		history: &'a [ChatMessage],
	) -> BoxFuture<'a, color_eyre::Result<UserProfile>> {
		Box::pin(extractor::extract(cfg, history))
	}
}

impl VectorIndex for QdrantStore {
	fn upsert<'a>(
		&'a self,
		namespace: &'a str,
		id_suffix: &'a str,
		vector: Vec<f32>,
		record: &'a BenefitRecord,
	) -> BoxFuture<'a, sal_storage::Result<()>> {
		Box::pin(QdrantStore::upsert(self, namespace, id_suffix, vector, record))
	}

	fn query<'a>(
		&'a self,
		namespace: &'a str,
		vector: Vec<f32>,
		maslul: Option<&'a str>,
		top_k: u32,
	) -> BoxFuture<'a, sal_storage::Result<Vec<BenefitRecord>>> {
		Box::pin(async move {
			let points = QdrantStore::query(self, namespace, vector, maslul, top_k).await?;

			Ok(points.iter().map(|point| BenefitRecord::from_payload(&point.payload)).collect())
		})
	}
}

pub struct SalService {
	pub cfg: Config,
	pub index: Arc<dyn VectorIndex>,
	pub providers: Providers,
}

impl SalService {
	pub fn new(cfg: Config, qdrant: QdrantStore) -> Self {
		Self { cfg, index: Arc::new(qdrant), providers: Providers::default() }
	}

	pub fn with_components(cfg: Config, index: Arc<dyn VectorIndex>, providers: Providers) -> Self {
		Self { cfg, index, providers }
	}

	pub(crate) async fn embed_one(&self, text: &str) -> ServiceResult<Vec<f32>> {
		let texts = [text.to_string()];
		let mut vectors = self.providers.embedding.embed(&self.cfg.providers.embedding, &texts).await?;

		if vectors.is_empty() {
			return Err(ServiceError::Provider {
				message: "Embedding provider returned no vectors.".to_string(),
			});
		}

		Ok(vectors.remove(0))
	}
}
