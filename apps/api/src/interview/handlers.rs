use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interview::engine::AnswerReply;
use crate::interview::summary::SessionSummary;
use crate::models::interview::{InterviewSession, SessionStatus};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct StartInterviewRequest {
    pub candidate_id: String,
}

#[derive(Serialize)]
pub struct StartInterviewResponse {
    pub session_id: String,
}

#[derive(Deserialize)]
pub struct AnswerRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: SessionStatus,
}

#[derive(Serialize)]
pub struct ResumeResponse {
    pub resumed: bool,
}

/// POST /api/v1/interviews
pub async fn handle_start_interview(
    State(state): State<AppState>,
    Json(req): Json<StartInterviewRequest>,
) -> Result<(StatusCode, Json<StartInterviewResponse>), AppError> {
    let candidate_id = req.candidate_id.trim();
    if candidate_id.is_empty() {
        return Err(AppError::Validation("candidate_id is required".to_string()));
    }

    let session_id = state.engine.start_interview(candidate_id).await?;
    Ok((StatusCode::CREATED, Json(StartInterviewResponse { session_id })))
}

/// POST /api/v1/interviews/:id/answers
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerReply>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("Answer text must not be empty".to_string()));
    }

    let reply = state.engine.process_answer(&session_id, &req.text).await?;
    Ok(Json(reply))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<InterviewSession>, AppError> {
    Ok(Json(state.engine.get_session(&session_id).await?))
}

/// GET /api/v1/interviews/:id/summary
pub async fn handle_session_summary(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSummary>, AppError> {
    Ok(Json(state.engine.session_summary(&session_id).await?))
}

/// POST /api/v1/interviews/:id/pause
pub async fn handle_pause(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    let status = state.engine.pause_session(&session_id).await?;
    Ok(Json(StatusResponse { status }))
}

/// POST /api/v1/interviews/:id/resume
pub async fn handle_resume(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ResumeResponse>, AppError> {
    let resumed = state.engine.resume_session(&session_id).await?;
    Ok(Json(ResumeResponse { resumed }))
}
