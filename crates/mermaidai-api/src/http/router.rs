//! Axum router configuration with middleware.
//!
//! Middleware: CORS, tracing. Static assets are served from
//! `AppConfig::static_dir` when that directory exists; API routes and
//! `/health` take priority.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = state.config.static_dir.clone();

    let mut router = Router::new()
        .route("/summarize", post(handlers::summarize::summarize))
        .route("/session", get(handlers::session::create_session))
        .route("/health", get(health_check));

    // Fallback must precede the layers so they also wrap static responses
    if std::path::Path::new(&static_dir).is_dir() {
        router = router.fallback_service(ServeDir::new(&static_dir));
        tracing::info!(path = %static_dir, "Static file serving enabled");
    } else {
        tracing::warn!(path = %static_dir, "Static directory not found, serving API only");
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use axum::Json;
    use axum::http::StatusCode;
    use axum::routing::post;
    use mermaidai_types::config::AppConfig;
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    use super::*;
    use crate::test_support;

    /// Stand-in for the upstream API.
    fn upstream() -> Router {
        Router::new()
            .route(
                "/chat/completions",
                post(|Json(body): Json<Value>| async move {
                    if body["model"] == "broken" {
                        return (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({"error": {"message": "bad key", "type": "invalid_request_error"}})),
                        );
                    }
                    (
                        StatusCode::OK,
                        Json(json!({
                            "id": "chatcmpl-1",
                            "object": "chat.completion",
                            "model": body["model"],
                            "choices": [{"index": 0, "message": {"role": "assistant", "content": "ok"}}]
                        })),
                    )
                }),
            )
            .route(
                "/realtime/sessions",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({
                        "id": "sess_1",
                        "model": body["model"],
                        "modalities": ["audio", "text"],
                        "client_secret": {"value": "ek_abc", "expires_at": 1700000000}
                    }))
                }),
            )
    }

    async fn backend(upstream_url: Option<String>, static_dir: &str) -> String {
        let base_url = match upstream_url {
            Some(url) => url,
            None => test_support::spawn(upstream()).await,
        };
        let config = AppConfig {
            openai_base_url: base_url,
            static_dir: static_dir.to_string(),
            ..AppConfig::default()
        };
        let state = AppState::new(config, SecretString::from("sk-test")).unwrap();
        test_support::spawn(build_router(state)).await
    }

    #[tokio::test]
    async fn test_summarize_returns_upstream_completion() {
        let base = backend(None, "missing-static").await;
        let response = reqwest::Client::new()
            .post(format!("{base}/summarize"))
            .json(&json!({"model": "gpt-3.5-turbo", "messages": [{"role": "user", "content": "hi"}]}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["choices"][0]["message"]["content"], "ok");
    }

    #[tokio::test]
    async fn test_summarize_rejects_undecodable_body() {
        let base = backend(None, "missing-static").await;
        let response = reqwest::Client::new()
            .post(format!("{base}/summarize"))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        assert_eq!(response.text().await.unwrap(), "invalid request");
    }

    #[tokio::test]
    async fn test_summarize_upstream_failure_is_500() {
        let base = backend(None, "missing-static").await;
        let response = reqwest::Client::new()
            .post(format!("{base}/summarize"))
            .json(&json!({"model": "broken", "messages": []}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        assert_eq!(response.text().await.unwrap(), "failed to get completion");
    }

    #[tokio::test]
    async fn test_session_mints_credential_for_configured_model() {
        let base = backend(None, "missing-static").await;
        let body: Value = reqwest::get(format!("{base}/session"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["model"], "gpt-4o-realtime-preview-2024-12-17");
        assert_eq!(body["client_secret"]["value"], "ek_abc");
        assert_eq!(body["client_secret"]["expires_at"], 1700000000);
    }

    #[tokio::test]
    async fn test_session_upstream_failure_is_500() {
        // Nothing listens on the upstream side.
        let base = backend(Some("http://127.0.0.1:9".to_string()), "missing-static").await;
        let response = reqwest::get(format!("{base}/session")).await.unwrap();

        assert_eq!(response.status(), 500);
        assert_eq!(response.text().await.unwrap(), "failed to create session");
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let base = backend(None, "missing-static").await;
        let body: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_static_assets_are_served() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("index.html"), "<h1>MermaidAI</h1>")
            .await
            .unwrap();

        let base = backend(None, &tmp.path().display().to_string()).await;
        let response = reqwest::get(format!("{base}/")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.unwrap(), "<h1>MermaidAI</h1>");

        let missing = reqwest::get(format!("{base}/nope.js")).await.unwrap();
        assert_eq!(missing.status(), 404);
    }

    #[tokio::test]
    async fn test_static_assets_carry_cors_headers() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("app.js"), "console.log(1)")
            .await
            .unwrap();

        let base = backend(None, &tmp.path().display().to_string()).await;
        let response = reqwest::Client::new()
            .get(format!("{base}/app.js"))
            .header("origin", "http://localhost:3000")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|value| value.to_str().ok()),
            Some("*")
        );
    }
}
