//! Web server for document upload and analysis.
//!
//! Two operations: a multipart upload endpoint that runs the full
//! extract → aggregate → analyze → classify → log pipeline, and a log
//! listing endpoint over the append-only analysis log.

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::extract::TextExtractor;
use crate::llm::LlmClient;
use crate::repository::LogRepository;

/// Shared state for the web server.
///
/// Every collaborator is constructed up front and injected; handlers hold
/// no global state.
#[derive(Clone)]
pub struct AppState {
    pub log_repo: Arc<LogRepository>,
    pub llm: Arc<LlmClient>,
    pub extractor: Arc<TextExtractor>,
}

impl AppState {
    pub fn new(settings: &Settings, llm: LlmClient) -> Self {
        Self {
            log_repo: Arc::new(settings.log_repository()),
            llm: Arc::new(llm),
            extractor: Arc::new(TextExtractor::new(&settings.uploads_dir)),
        }
    }
}

/// Start the web server.
///
/// Refuses to start when the oracle credential is missing, and creates the
/// uploads directory and log table before accepting connections.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let llm = LlmClient::from_env()?;

    settings.ensure_dirs()?;
    let state = AppState::new(settings, llm);
    state.log_repo.init_schema().await?;

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tempfile::tempdir;
    use tower::ServiceExt;

    use crate::llm::LlmConfig;

    async fn setup_test_app() -> (axum::Router, Arc<LogRepository>, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let settings = Settings {
            data_dir: dir.path().to_path_buf(),
            uploads_dir: dir.path().join("uploads"),
            database_filename: "test.db".to_string(),
            database_url: None,
        };
        settings.ensure_dirs().unwrap();

        // Unroutable endpoint: any test that reached the oracle would fail
        // loudly instead of calling out.
        let llm = LlmClient::new(LlmConfig {
            api_key: Some("test-key".to_string()),
            endpoint: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        });

        let state = AppState::new(&settings, llm);
        state.log_repo.init_schema().await.unwrap();

        let repo = state.log_repo.clone();
        let app = create_router(state);
        (app, repo, dir)
    }

    fn multipart_request(filename: &str, content_type: &str, body_text: &str) -> Request<Body> {
        let boundary = "dealscan-test-boundary";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{f}\"\r\nContent-Type: {t}\r\n\r\n{x}\r\n--{b}--\r\n",
            b = boundary,
            f = filename,
            t = content_type,
            x = body_text,
        );

        Request::builder()
            .method("POST")
            .uri("/upload-documents/")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _repo, _dir) = setup_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_logs_empty() {
        let (app, _repo, _dir) = setup_test_app().await;

        let response = app
            .oneshot(Request::builder().uri("/logs/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json.is_array());
        assert_eq!(json.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_logs_after_appends() {
        let (app, repo, _dir) = setup_test_app().await;

        repo.append("first request", "{\"summary\":[]}").await.unwrap();
        repo.append("second request", "{\"summary\":[]}").await.unwrap();

        let response = app
            .oneshot(Request::builder().uri("/logs/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["request"], "first request");
        assert!(entries[0]["id"].as_i64().unwrap() < entries[1]["id"].as_i64().unwrap());
        assert!(entries[0]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_upload_unsupported_type_is_rejected() {
        let (app, repo, _dir) = setup_test_app().await;

        let response = app
            .oneshot(multipart_request("notes.txt", "text/plain", "plain text"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        let detail = json["detail"].as_str().unwrap();
        assert!(detail.contains("notes.txt"));

        // No partial log write
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upload_without_files_is_rejected() {
        let (app, _repo, _dir) = setup_test_app().await;

        let boundary = "dealscan-test-boundary";
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/upload-documents/")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(Body::from(format!("--{}--\r\n", boundary)))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["detail"], "No files uploaded");
    }
}
