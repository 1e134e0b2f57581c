//! HTTP API server.
//!
//! Provides REST endpoints for chatting, classification and session cleanup.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::KotaeError;
use crate::intent;
use crate::language;
use crate::orchestrator::Orchestrator;
use crate::retrieval::Passage;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;
use uuid::Uuid;

/// Passages echoed back with each chat reply.
pub const REPLY_PASSAGES: usize = 2;

/// Endpoints listed in the startup banner, in axum path syntax.
const ENDPOINTS: &[(&str, &str)] = &[
    ("Health", "GET    /health"),
    ("Stats", "GET    /stats"),
    ("Chat", "POST   /chat"),
    ("Classify", "POST   /classify"),
    ("End session", "DELETE /sessions/{session_id}"),
];

/// Shared application state.
pub struct AppState {
    pub orchestrator: Orchestrator,
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/chat", post(chat))
        .route("/classify", post(classify))
        .route("/sessions/{session_id}", delete(delete_session))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let orchestrator = Orchestrator::new(settings)?;
    let app = router(Arc::new(AppState { orchestrator }));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Kotae API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    for (name, route) in ENDPOINTS {
        Output::kv(name, route);
    }
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    session_id: Option<Uuid>,
}

#[derive(Serialize)]
struct ChatReply {
    success: bool,
    session_id: Uuid,
    response: String,
    sources: Vec<String>,
    confidence: f32,
    topic: String,
    passages: Vec<Passage>,
}

#[derive(Serialize)]
struct StatsReply {
    passages: usize,
    sessions: usize,
}

#[derive(Deserialize)]
struct ClassifyRequest {
    message: String,
}

#[derive(Serialize)]
struct ClassifyReply {
    topic: String,
    emotion: String,
    language: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

fn error_response(status: StatusCode, message: String) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message,
        }),
    )
        .into_response()
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "sessions": state.orchestrator.sessions().len(),
    }))
}

async fn stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.orchestrator.retriever().passage_count().await {
        Ok(passages) => Json(StatsReply {
            passages,
            sessions: state.orchestrator.sessions().len(),
        })
        .into_response(),
        Err(e) => {
            error!("Failed to read index statistics: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    match state.orchestrator.chat(req.session_id, &req.message).await {
        Ok((session_id, mut reply)) => {
            reply.passages.truncate(REPLY_PASSAGES);
            Json(ChatReply {
                success: true,
                session_id,
                response: reply.response,
                sources: reply.sources,
                confidence: reply.confidence,
                topic: reply.topic.to_string(),
                passages: reply.passages,
            })
            .into_response()
        }
        Err(KotaeError::InvalidInput(msg)) => error_response(StatusCode::BAD_REQUEST, msg),
        Err(e) => {
            error!("Chat request failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn classify(Json(req): Json<ClassifyRequest>) -> impl IntoResponse {
    let intent = intent::classify(&req.message);
    Json(ClassifyReply {
        topic: intent.topic.to_string(),
        emotion: intent.emotion.to_string(),
        language: language::detect(&req.message).to_string(),
    })
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> impl IntoResponse {
    if state.orchestrator.sessions().remove(&session_id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        error_response(
            StatusCode::NOT_FOUND,
            format!("Session not found: {}", session_id),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> (Arc<AppState>, Router) {
        let orchestrator = Orchestrator::new(Settings::default()).unwrap();
        let state = Arc::new(AppState { orchestrator });
        (state.clone(), router(state))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_banner_lists_routable_paths() {
        let (state, app) = app();
        let (id, _) = state.orchestrator.sessions().create();

        for (_, route) in ENDPOINTS {
            let (method, path) = route.split_once(' ').unwrap();
            let path = path.trim().replace("{session_id}", &id.to_string());
            assert!(!path.contains(':'), "{}", route);

            let body = if method == "POST" {
                Body::from(r#"{"message":"hello"}"#)
            } else {
                Body::empty()
            };
            let req = Request::builder()
                .method(method)
                .uri(&path)
                .header("content-type", "application/json")
                .body(body)
                .unwrap();
            let res = app.clone().oneshot(req).await.unwrap();
            assert!(res.status().is_success(), "{} -> {}", route, res.status());
        }
    }

    #[tokio::test]
    async fn test_health() {
        let (_, app) = app();
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_chat_keeps_session() {
        let (state, app) = app();

        let res = app
            .clone()
            .oneshot(post_json("/chat", serde_json::json!({ "message": "怖くて挑戦できません" })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["topic"], "fear_overcoming");
        assert!((json["confidence"].as_f64().unwrap() - 0.9).abs() < 1e-6);

        let session_id = json["session_id"].as_str().unwrap().to_string();
        let res = app
            .oneshot(post_json(
                "/chat",
                serde_json::json!({ "message": "ありがとう", "session_id": session_id }),
            ))
            .await
            .unwrap();
        let json = body_json(res).await;
        assert_eq!(json["session_id"], session_id.as_str());
        assert_eq!(state.orchestrator.sessions().len(), 1);
    }

    #[tokio::test]
    async fn test_chat_echoes_top_passages() {
        let (_, app) = app();
        let res = app
            .oneshot(post_json("/chat", serde_json::json!({ "message": "グローバル戦略とデジタル経営" })))
            .await
            .unwrap();
        let json = body_json(res).await;

        let passages = json["passages"].as_array().unwrap();
        let sources = json["sources"].as_array().unwrap();
        assert!(sources.len() > REPLY_PASSAGES);
        assert_eq!(passages.len(), REPLY_PASSAGES);
        assert_eq!(passages[0]["source"], sources[0]);
        assert!(passages[0]["content"].as_str().is_some());
        assert!(passages[0]["score"].as_f64().unwrap() >= passages[1]["score"].as_f64().unwrap());
    }

    #[tokio::test]
    async fn test_stats() {
        let (state, app) = app();
        state.orchestrator.sessions().create();

        let req = Request::builder().uri("/stats").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let json = body_json(res).await;
        let expected = state.orchestrator.retriever().passage_count().await.unwrap();
        assert_eq!(json["passages"].as_u64().unwrap() as usize, expected);
        assert!(expected > 0);
        assert_eq!(json["sessions"], 1);
    }

    #[tokio::test]
    async fn test_empty_message_is_bad_request() {
        let (_, app) = app();
        let res = app
            .oneshot(post_json("/chat", serde_json::json!({ "message": "  " })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let json = body_json(res).await;
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_classify_endpoint() {
        let (_, app) = app();
        let res = app
            .oneshot(post_json("/classify", serde_json::json!({ "message": "What is global strategy?" })))
            .await
            .unwrap();
        let json = body_json(res).await;
        assert_eq!(json["topic"], "global_strategy");
        assert_eq!(json["language"], "en");
        assert_eq!(json["emotion"], "neutral");
    }

    #[tokio::test]
    async fn test_delete_session() {
        let (state, app) = app();
        let (id, _) = state.orchestrator.sessions().create();

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/sessions/{}", id))
            .body(Body::empty())
            .unwrap();
        let res = app.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/sessions/{}", id))
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
