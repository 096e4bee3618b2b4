use std::sync::{Arc, Mutex};

use axum::{
	body::{self, Body},
	http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::util::ServiceExt;

use sal_api::{routes, state::AppState};
use sal_config::{
	Config, EmbeddingProviderConfig, LlmProviderConfig, Providers as ProviderSettings, Qdrant,
	Retrieval, Service, Storage,
};
use sal_domain::{conversation::ChatMessage, profile::UserProfile};
use sal_service::{
	BoxFuture, CompletionProvider, EmbeddingProvider, ExtractorProvider, Providers, SalService,
	VectorIndex,
};
use sal_storage::models::BenefitRecord;

fn llm_settings() -> LlmProviderConfig {
	LlmProviderConfig {
		api_base: "http://localhost:9".to_string(),
		api_key: "test-key".to_string(),
		path: "/v1/chat/completions".to_string(),
		model: "test-chat".to_string(),
		temperature: 0.2,
		max_tokens: 512,
		timeout_ms: 1_000,
		default_headers: Default::default(),
	}
}

fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage {
			qdrant: Qdrant {
				url: "http://localhost:6334".to_string(),
				collection: "benefits".to_string(),
				vector_dim: 4,
			},
		},
		providers: ProviderSettings {
			embedding: EmbeddingProviderConfig {
				api_base: "http://localhost:9".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/embeddings".to_string(),
				model: "test-embed".to_string(),
				dimensions: 4,
				timeout_ms: 1_000,
				default_headers: Default::default(),
			},
			chat: llm_settings(),
			extractor: llm_settings(),
		},
		retrieval: Retrieval { top_k: 4 },
	}
}

struct StubProviders {
	reply: String,
	extractor_fails: bool,
}

impl EmbeddingProvider for StubProviders {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(texts.iter().map(|_| vec![0.1, 0.2, 0.3, 0.4]).collect()) })
	}
}

impl CompletionProvider for StubProviders {
	fn complete<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move { Ok(self.reply.clone()) })
	}
}

impl ExtractorProvider for StubProviders {
	fn extract<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_history: &'a [ChatMessage],
	) -> BoxFuture<'a, color_eyre::Result<UserProfile>> {
		Box::pin(async move {
			if self.extractor_fails {
				return Err(color_eyre::eyre::eyre!("extractor backend unavailable"));
			}

			Ok(UserProfile { hmo_name: "מכבי".to_string(), ..Default::default() })
		})
	}
}

#[derive(Default)]
struct EmptyIndex {
	queries: Mutex<u32>,
}

impl VectorIndex for EmptyIndex {
	fn upsert<'a>(
		&'a self,
		_namespace: &'a str,
		_id_suffix: &'a str,
		_vector: Vec<f32>,
		_record: &'a BenefitRecord,
	) -> BoxFuture<'a, sal_storage::Result<()>> {
		Box::pin(async move { Ok(()) })
	}

	fn query<'a>(
		&'a self,
		_namespace: &'a str,
		_vector: Vec<f32>,
		_maslul: Option<&'a str>,
		_top_k: u32,
	) -> BoxFuture<'a, sal_storage::Result<Vec<BenefitRecord>>> {
		Box::pin(async move {
			*self.queries.lock().expect("lock") += 1;

			Ok(Vec::new())
		})
	}
}

fn test_app(reply: &str, extractor_fails: bool) -> axum::Router {
	let provider = Arc::new(StubProviders { reply: reply.to_string(), extractor_fails });
	let providers = Providers::new(provider.clone(), provider.clone(), provider);
	let service =
		SalService::with_components(test_config(), Arc::new(EmptyIndex::default()), providers);

	routes::router(AppState::with_service(service))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body.to_string()))
		.expect("Failed to build request.")
}

async fn json_body(response: axum::response::Response) -> Value {
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	serde_json::from_slice(&bytes).expect("Response body is not JSON.")
}

#[tokio::test]
async fn health_ok() {
	let app = test_app("", false);
	let response = app
		.oneshot(
			Request::builder()
				.uri("/health")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn chat_round_trip() {
	let app = test_app("מה שמך המלא?", false);
	let response = app
		.oneshot(post_json(
			"/v1/chat",
			serde_json::json!({
				"history": [{ "role": "user", "content": "שלום" }],
			}),
		))
		.await
		.expect("Failed to call /v1/chat.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = json_body(response).await;

	assert_eq!(json["answer"], "מה שמך המלא?");
	assert_eq!(json["namespace"], "");
	assert_eq!(json["retrieved_docs"], serde_json::json!([]));
}

#[tokio::test]
async fn chat_defaults_missing_fields() {
	let app = test_app("שלום!", false);
	let response = app
		.oneshot(post_json("/v1/chat", serde_json::json!({})))
		.await
		.expect("Failed to call /v1/chat.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = json_body(response).await;

	assert_eq!(json["answer"], "שלום!");
}

#[tokio::test]
async fn extract_user_data_round_trip() {
	let app = test_app("", false);
	let response = app
		.oneshot(post_json(
			"/v1/extract_user_data",
			serde_json::json!({
				"history": [
					{ "role": "assistant", "content": "מה הקופה שלך?" },
					{ "role": "user", "content": "מכבי" }
				],
			}),
		))
		.await
		.expect("Failed to call /v1/extract_user_data.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = json_body(response).await;

	assert_eq!(json["user_data"]["hmo_name"], "מכבי");
	assert_eq!(json["user_data"]["first_name"], "");
}

#[tokio::test]
async fn extract_user_data_maps_provider_failures_to_bad_gateway() {
	let app = test_app("", true);
	let response = app
		.oneshot(post_json("/v1/extract_user_data", serde_json::json!({ "history": [] })))
		.await
		.expect("Failed to call /v1/extract_user_data.");

	assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

	let json = json_body(response).await;

	assert_eq!(json["error_code"], "provider_error");
}
