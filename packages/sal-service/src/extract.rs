use serde::{Deserialize, Serialize};

use sal_domain::{conversation::ChatMessage, profile::UserProfile};

use crate::{SalService, ServiceResult};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExtractRequest {
	#[serde(default)]
	pub history: Vec<ChatMessage>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
	pub user_data: UserProfile,
}

impl SalService {
	/// Extracts the identity profile from the transcript. An undecodable
	/// model reply already degrades to an empty profile inside the provider;
	/// only transport failures surface here.
	pub async fn extract_user_data(
		&self,
		request: &ExtractRequest,
	) -> ServiceResult<ExtractResponse> {
		let user_data = self
			.providers
			.extractor
			.extract(&self.cfg.providers.extractor, &request.history)
			.await?;

		Ok(ExtractResponse { user_data })
	}
}
