pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/interviews", post(handlers::handle_start_interview))
        .route("/api/v1/interviews/:id", get(handlers::handle_get_session))
        .route(
            "/api/v1/interviews/:id/answers",
            post(handlers::handle_submit_answer),
        )
        .route(
            "/api/v1/interviews/:id/summary",
            get(handlers::handle_session_summary),
        )
        .route("/api/v1/interviews/:id/pause", post(handlers::handle_pause))
        .route("/api/v1/interviews/:id/resume", post(handlers::handle_resume))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::interview::cache::AskedQuestionCache;
    use crate::interview::engine::InterviewEngine;
    use crate::interview::fallback::StaticBank;
    use crate::interview::questions::QuestionGenerator;
    use crate::interview::scoring::HeuristicScorer;
    use crate::models::candidate::{Candidate, RawTechnology, TechStackCategory};
    use crate::store::memory::{MemoryCandidateDirectory, MemorySessionStore};

    fn app() -> Router {
        let candidates = MemoryCandidateDirectory::new();
        candidates
            .insert(Candidate {
                candidate_id: "cand-1".to_string(),
                full_name: "Grace Hopper".to_string(),
                email: "grace@example.com".to_string(),
                phone_number: String::new(),
                years_experience: 12,
                desired_positions: vec![],
                current_location: String::new(),
                tech_stack: vec![TechStackCategory {
                    category: "Languages".to_string(),
                    technologies: vec![RawTechnology::new("JavaScript", "Intermediate")],
                }],
                created_at: Utc::now(),
            })
            .unwrap();

        let engine = InterviewEngine::new(
            Arc::new(MemorySessionStore::new()),
            Arc::new(candidates),
            QuestionGenerator::new(None, StaticBank::new(Some(1)), AskedQuestionCache::new(8)),
            Arc::new(HeuristicScorer),
        );
        build_router(AppState {
            engine: Arc::new(engine),
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_full_interview_over_http() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/interviews",
            Some(json!({"candidate_id": "cand-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["session_id"].as_str().unwrap().to_string();
        let answers_uri = format!("/api/v1/interviews/{id}/answers");

        for expected in ["active", "active", "completed"] {
            let (status, body) = send(
                &app,
                "POST",
                &answers_uri,
                Some(json!({"text": "I built a REST api with async code"})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], expected);
        }

        let (status, body) = send(&app, "GET", &format!("/api/v1/interviews/{id}/summary"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_questions"], 3);
        assert_eq!(body["completion_status"], "completed");
    }

    #[tokio::test]
    async fn test_blank_answer_is_rejected() {
        let app = app();
        let (_, body) = send(
            &app,
            "POST",
            "/api/v1/interviews",
            Some(json!({"candidate_id": "cand-1"})),
        )
        .await;
        let id = body["session_id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/v1/interviews/{id}/answers"),
            Some(json!({"text": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_session_and_candidate() {
        let app = app();
        let (status, _) = send(&app, "GET", "/api/v1/interviews/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/interviews",
            Some(json!({"candidate_id": "cand-404"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_pause_then_resume() {
        let app = app();
        let (_, body) = send(
            &app,
            "POST",
            "/api/v1/interviews",
            Some(json!({"candidate_id": "cand-1"})),
        )
        .await;
        let id = body["session_id"].as_str().unwrap().to_string();

        let (_, body) = send(&app, "POST", &format!("/api/v1/interviews/{id}/pause"), None).await;
        assert_eq!(body["status"], "paused");
        let (_, body) = send(&app, "POST", &format!("/api/v1/interviews/{id}/resume"), None).await;
        assert_eq!(body["resumed"], true);
    }
}
