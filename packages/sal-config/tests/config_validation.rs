use serde_json::Map;

use sal_config::{
	Config, EmbeddingProviderConfig, LlmProviderConfig, Providers, Qdrant, Retrieval, Service,
	Storage,
};

fn embedding_provider() -> EmbeddingProviderConfig {
	EmbeddingProviderConfig {
		api_base: "http://localhost".to_string(),
		api_key: "key".to_string(),
		path: "/v1/embeddings".to_string(),
		model: "m".to_string(),
		dimensions: 4,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

fn llm_provider() -> LlmProviderConfig {
	LlmProviderConfig {
		api_base: "http://localhost".to_string(),
		api_key: "key".to_string(),
		path: "/v1/chat/completions".to_string(),
		model: "m".to_string(),
		temperature: 0.2,
		max_tokens: 512,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

fn base_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:8000".to_string(), log_level: "info".to_string() },
		storage: Storage {
			qdrant: Qdrant {
				url: "http://localhost:6334".to_string(),
				collection: "benefits".to_string(),
				vector_dim: 4,
			},
		},
		providers: Providers {
			embedding: embedding_provider(),
			chat: llm_provider(),
			extractor: llm_provider(),
		},
		retrieval: Retrieval::default(),
	}
}

#[test]
fn accepts_valid_config() {
	assert!(sal_config::validate(&base_config()).is_ok());
}

#[test]
fn top_k_defaults_to_four() {
	assert_eq!(Retrieval::default().top_k, 4);
}

#[test]
fn rejects_dimension_mismatch() {
	let mut cfg = base_config();
	cfg.providers.embedding.dimensions = 8;

	let err = sal_config::validate(&cfg).expect_err("mismatch must fail");

	assert!(err.to_string().contains("vector_dim"));
}

#[test]
fn rejects_empty_api_key() {
	let mut cfg = base_config();
	cfg.providers.chat.api_key = " ".to_string();

	assert!(sal_config::validate(&cfg).is_err());
}

#[test]
fn rejects_zero_top_k() {
	let mut cfg = base_config();
	cfg.retrieval.top_k = 0;

	assert!(sal_config::validate(&cfg).is_err());
}

#[test]
fn load_reports_the_missing_path() {
	let path = std::path::Path::new("/nonexistent/sal.toml");
	let err = sal_config::load(path).expect_err("missing file must fail");

	assert!(matches!(err, sal_config::Error::Read { .. }));
	assert!(err.to_string().contains("/nonexistent/sal.toml"));
}

#[test]
fn parses_toml_with_default_retrieval() {
	let raw = r#"
		[service]
		http_bind = "127.0.0.1:8000"
		log_level = "info"

		[storage.qdrant]
		url = "http://localhost:6334"
		collection = "benefits"
		vector_dim = 1536

		[providers.embedding]
		api_base = "http://localhost"
		api_key = "key"
		path = "/v1/embeddings"
		model = "text-embedding-3-small"
		dimensions = 1536
		timeout_ms = 10000

		[providers.chat]
		api_base = "http://localhost"
		api_key = "key"
		path = "/v1/chat/completions"
		model = "gpt-4o"
		temperature = 0.2
		max_tokens = 512
		timeout_ms = 30000

		[providers.extractor]
		api_base = "http://localhost"
		api_key = "key"
		path = "/v1/chat/completions"
		model = "gpt-4o"
		temperature = 0.0
		max_tokens = 256
		timeout_ms = 30000
	"#;
	let cfg: Config = toml::from_str(raw).expect("config must parse");

	assert_eq!(cfg.retrieval.top_k, 4);
	assert!(sal_config::validate(&cfg).is_ok());
}
