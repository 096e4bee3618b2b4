use std::sync::Arc;

use sal_service::SalService;
use sal_storage::qdrant::QdrantStore;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SalService>,
}
impl AppState {
	pub fn new(config: sal_config::Config) -> color_eyre::Result<Self> {
		let qdrant = QdrantStore::new(&config.storage.qdrant)?;
		let service = SalService::new(config, qdrant);

		Ok(Self { service: Arc::new(service) })
	}

	pub fn with_service(service: SalService) -> Self {
		Self { service: Arc::new(service) }
	}
}
