//! Shared helpers for exporter integration tests: an in-process mock of
//! the registry's components endpoint served by axum.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use inventory_core::feed::FeedSpec;
use inventory_exporter::config::ExporterConfig;
use inventory_exporter::output::OutputDirMode;

pub const TEST_CREDENTIAL: &str = "YWRtaW46YWRtaW4xMjM=";

/// What the mock answers for one `(repository, continuationToken)` pair.
#[derive(Clone)]
pub enum MockPage {
    Items {
        items: Vec<Value>,
        next: Option<&'static str>,
    },
    Fail(StatusCode),
}

/// A request as seen by the mock registry.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub repository: Option<String>,
    pub continuation_token: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Clone, Default)]
pub struct MockRegistry {
    pages: Arc<HashMap<(String, Option<String>), MockPage>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockRegistry {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Builder for the mock's page table.
#[derive(Default)]
pub struct MockRegistryBuilder {
    pages: HashMap<(String, Option<String>), MockPage>,
}

impl MockRegistryBuilder {
    pub fn page(
        mut self,
        repository: &str,
        token: Option<&str>,
        items: Vec<Value>,
        next: Option<&'static str>,
    ) -> Self {
        self.pages.insert(
            (repository.to_string(), token.map(str::to_string)),
            MockPage::Items { items, next },
        );
        self
    }

    pub fn failure(mut self, repository: &str, token: Option<&str>, status: StatusCode) -> Self {
        self.pages.insert(
            (repository.to_string(), token.map(str::to_string)),
            MockPage::Fail(status),
        );
        self
    }

    /// Serve the mock on an ephemeral local port, returning its base URL.
    pub async fn serve(self) -> (String, MockRegistry) {
        let registry = MockRegistry {
            pages: Arc::new(self.pages),
            requests: Arc::default(),
        };

        let app = Router::new()
            .route("/service/rest/v1/components", get(list_components))
            .with_state(registry.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), registry)
    }
}

async fn list_components(
    State(registry): State<MockRegistry>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let request = RecordedRequest {
        repository: params.get("repository").cloned(),
        continuation_token: params.get("continuationToken").cloned(),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    registry.requests.lock().unwrap().push(request.clone());

    let key = (
        request.repository.unwrap_or_default(),
        request.continuation_token,
    );
    match registry.pages.get(&key) {
        Some(MockPage::Items { items, next }) => Json(json!({
            "items": items,
            "continuationToken": next,
        }))
        .into_response(),
        Some(MockPage::Fail(status)) => (*status, "simulated registry failure").into_response(),
        None => (StatusCode::NOT_FOUND, "unknown repository or token").into_response(),
    }
}

/// A registry component as the real API shapes it.
pub fn component(repository: &str, name: &str, version: &str) -> Value {
    json!({
        "id": format!("{repository}:{name}:{version}"),
        "repository": repository,
        "format": "npm",
        "group": null,
        "name": name,
        "version": version,
        "assets": [],
    })
}

/// Config pointing at `base_url`, writing into `output_dir`.
pub fn test_config(base_url: &str, output_dir: &Path, feeds: Vec<FeedSpec>) -> ExporterConfig {
    ExporterConfig {
        base_url: base_url.to_string(),
        credential: TEST_CREDENTIAL.to_string(),
        output_dir: output_dir.to_path_buf(),
        output_dir_mode: OutputDirMode::Fresh,
        feeds,
        request_timeout_secs: Some(10),
        fail_on_partial: false,
    }
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}
