#![allow(dead_code)]

use mongodb::Client as MongoClient;
use secrecy::Secret;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use text_service::config::{MongoConfig, RepositoryBackend, RepositoryConfig, TextConfig};
use text_service::startup::{AppState, Application};
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub state: AppState,
    pub client: reqwest::Client,
    mongo: Option<(String, String)>,
}

fn mongo_uri() -> String {
    std::env::var("TEST_MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

impl TestApp {
    /// Spawn against the in-memory repository.
    pub async fn spawn() -> Self {
        Self::spawn_with(RepositoryBackend::Memory).await
    }

    /// Spawn against a throwaway MongoDB database.
    pub async fn spawn_with_mongo() -> Self {
        Self::spawn_with(RepositoryBackend::Mongo).await
    }

    async fn spawn_with(backend: RepositoryBackend) -> Self {
        let uri = mongo_uri();
        let db_name = format!("text_test_{}", Uuid::new_v4());

        let config = TextConfig {
            common: CoreConfig {
                port: 0, // Random port for testing
                log_level: "info".to_string(),
                otlp_endpoint: None,
            },
            repository: RepositoryConfig { backend },
            mongodb: MongoConfig {
                uri: Secret::new(uri.clone()),
                database: db_name.clone(),
                collection: "text".to_string(),
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let state = app.state();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        let mongo = (backend == RepositoryBackend::Mongo).then_some((uri, db_name));

        TestApp {
            address,
            port,
            state,
            client,
            mongo,
        }
    }

    pub async fn insert(&self, text: &str) -> Value {
        let response = self
            .client
            .post(format!("{}/texts", self.address))
            .query(&[("text", text)])
            .send()
            .await
            .expect("Failed to execute request");
        assert!(response.status().is_success());
        response.json().await.expect("Failed to parse JSON")
    }

    pub async fn get(&self, id: &str) -> reqwest::Response {
        self.client
            .get(format!("{}/texts/{}", self.address, id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn list(&self) -> Vec<Value> {
        let response = self
            .client
            .get(format!("{}/texts", self.address))
            .send()
            .await
            .expect("Failed to execute request");
        assert!(response.status().is_success());
        response.json().await.expect("Failed to parse JSON")
    }

    pub async fn update(&self, path_id: &str, body: Value) -> reqwest::Response {
        self.client
            .put(format!("{}/texts/{}", self.address, path_id))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Drop the MongoDB database, if one was used.
    pub async fn cleanup(&self) {
        if let Some((uri, db_name)) = &self.mongo {
            if let Ok(client) = MongoClient::with_uri_str(uri).await {
                let _ = client.database(db_name).drop(None).await;
            }
        }
    }
}
