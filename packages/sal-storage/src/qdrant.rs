//! Qdrant store for benefit chunks. One collection holds every HMO; the
//! `namespace` payload field partitions it and is filtered on every query.

pub const NAMESPACE_FIELD: &str = "namespace";
pub const TIER_FIELD: &str = "maslul";

use qdrant_client::qdrant::{
	Condition, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, Distance, FieldType,
	Filter, PointStruct, Query, QueryPointsBuilder, ScoredPoint, UpsertPointsBuilder,
	VectorParamsBuilder,
};
use uuid::Uuid;

use crate::{Result, models::BenefitRecord};

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &sal_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Creates the collection and its keyword indexes when absent. Safe to
	/// call on every indexer run.
	pub async fn ensure_collection(&self) -> Result<()> {
		if self.client.collection_exists(&self.collection).await? {
			return Ok(());
		}

		let builder = CreateCollectionBuilder::new(self.collection.clone()).vectors_config(
			VectorParamsBuilder::new(self.vector_dim.into(), Distance::Cosine),
		);

		self.client.create_collection(builder).await?;

		for field in [NAMESPACE_FIELD, TIER_FIELD] {
			self.client
				.create_field_index(CreateFieldIndexCollectionBuilder::new(
					self.collection.clone(),
					field,
					FieldType::Keyword,
				))
				.await?;
		}

		Ok(())
	}

	/// Upserts one chunk. The point id is derived from `(namespace,
	/// id_suffix)`, so re-indexing the same page overwrites in place.
	pub async fn upsert(
		&self,
		namespace: &str,
		id_suffix: &str,
		vector: Vec<f32>,
		record: &BenefitRecord,
	) -> Result<()> {
		if vector.len() != self.vector_dim as usize {
			return Err(crate::Error::InvalidArgument(format!(
				"Vector has {} dimensions, collection expects {}.",
				vector.len(),
				self.vector_dim
			)));
		}

		let mut payload = record.to_payload();

		payload.insert(NAMESPACE_FIELD, namespace.to_string());

		let point = PointStruct::new(point_id(namespace, id_suffix), vector, payload);
		let upsert = UpsertPointsBuilder::new(self.collection.clone(), vec![point]).wait(true);

		self.client.upsert_points(upsert).await?;

		Ok(())
	}

	/// Nearest-neighbour query within one namespace, optionally narrowed to a
	/// membership tier.
	pub async fn query(
		&self,
		namespace: &str,
		vector: Vec<f32>,
		maslul: Option<&str>,
		top_k: u32,
	) -> Result<Vec<ScoredPoint>> {
		let mut conditions = vec![Condition::matches(NAMESPACE_FIELD, namespace.to_string())];

		if let Some(maslul) = maslul {
			conditions.push(Condition::matches(TIER_FIELD, maslul.to_string()));
		}

		let search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector))
			.filter(Filter::must(conditions))
			.limit(top_k as u64)
			.with_payload(true);
		let response = self.client.query(search).await?;

		Ok(response.result)
	}
}

/// Deterministic point id so identical `(namespace, suffix)` pairs collide on
/// purpose across indexer runs.
pub fn point_id(namespace: &str, id_suffix: &str) -> String {
	Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("{namespace}_{id_suffix}").as_bytes()).to_string()
}
