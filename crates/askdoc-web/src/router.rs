use askdoc_llm::LlmProvider;
use axum::Router;
use axum::routing::{get, post};
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{ask_handler, form_page, health_handler};
use crate::server::AppState;

pub(crate) fn build_router<P: LlmProvider + 'static>(
    state: AppState<P>,
    max_body_size: usize,
) -> Router {
    Router::new()
        .route("/", get(form_page))
        .route("/ask", post(ask_handler))
        .route("/health", get(health_handler))
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use askdoc_core::{Config, Engine};
    use askdoc_llm::mock::MockProvider;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    async fn make_router(provider: MockProvider) -> Router {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.md");
        std::fs::write(&path, "| Falcon | 242 |\n\n| Swift | 106 |\n").unwrap();

        let mut config: Config = toml::from_str("[document]\npath = \"x\"\n").unwrap();
        config.document.path = path;
        config.chunking.chunk_size = 20;
        config.chunking.chunk_overlap = 0;
        config.retrieval.top_k = 1;

        let engine = Engine::build(&config, Arc::new(provider)).await.unwrap();
        let state = AppState {
            engine: Arc::new(engine),
            started_at: Instant::now(),
        };
        build_router(state, 1_048_576)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_form(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/ask")
            .header(
                header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn index_renders_form() {
        let app = make_router(MockProvider::default()).await;
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("<form"));
        assert!(body.contains("name=\"question\""));
    }

    #[tokio::test]
    async fn blank_question_shows_warning_without_pipeline() {
        let app = make_router(MockProvider::failing()).await;
        // A failing chat provider would turn any pipeline call into an error
        // block; the warning instead proves the pipeline was never invoked.
        let response = app.oneshot(post_form("question=+++")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Please enter a valid question."));
        assert!(!body.contains("An error occurred"));
    }

    #[tokio::test]
    async fn question_returns_answer_and_sources() {
        let provider = MockProvider::with_responses(vec!["242 mph".into()]);
        let app = make_router(provider).await;
        let response = app
            .oneshot(post_form("question=how+fast+is+the+falcon%3F"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("242 mph"));
        assert!(body.contains("fixture.md"));
    }

    #[tokio::test]
    async fn pipeline_error_renders_error_block() {
        let app = make_router(MockProvider::failing()).await;
        let response = app.oneshot(post_form("question=anything")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("An error occurred"));
        // The form is still present for the next submission.
        assert!(body.contains("<form"));
    }

    #[tokio::test]
    async fn health_reports_index_entries() {
        let app = make_router(MockProvider::default()).await;
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
        let body = body_text(response).await;
        assert!(body.contains("\"status\":\"ok\""));
        assert!(body.contains("index_entries"));
    }

    #[tokio::test]
    async fn oversized_body_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, "content").unwrap();

        let mut config: Config = toml::from_str("[document]\npath = \"x\"\n").unwrap();
        config.document.path = path;
        let engine = Engine::build(&config, Arc::new(MockProvider::default()))
            .await
            .unwrap();
        let state = AppState {
            engine: Arc::new(engine),
            started_at: Instant::now(),
        };
        let app = build_router(state, 16);

        let response = app
            .oneshot(post_form("question=this+body+is+well+past+sixteen+bytes"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
