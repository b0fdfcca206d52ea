use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::interview::{InterviewSession, SessionStatus};

/// Read-only digest of a session for reviewers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub candidate_id: String,
    /// Answered questions.
    pub total_questions: usize,
    pub duration_minutes: f64,
    /// In the order they were first answered.
    pub technologies_covered: Vec<String>,
    pub conversation_length: usize,
    pub completion_status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub total_points: f64,
    pub max_possible_points: f64,
    pub total_rating_display: String,
    pub average_rating: Option<f64>,
}

/// Builds the summary; open sessions are measured up to `now`.
pub fn summarize(session: &InterviewSession, now: DateTime<Utc>) -> SessionSummary {
    let mut technologies_covered: Vec<String> = Vec::new();
    for rating in &session.answer_ratings {
        if !technologies_covered.contains(&rating.technology) {
            technologies_covered.push(rating.technology.clone());
        }
    }

    let end = session.completed_at.unwrap_or(now);
    let seconds = (end - session.started_at).num_seconds().max(0) as f64;
    let duration_minutes = (seconds / 6.0).round() / 10.0;

    SessionSummary {
        session_id: session.session_id.clone(),
        candidate_id: session.candidate_id.clone(),
        total_questions: session.answer_ratings.len(),
        duration_minutes,
        technologies_covered,
        conversation_length: session.conversation_history.len(),
        completion_status: session.status,
        started_at: session.started_at,
        completed_at: session.completed_at,
        total_points: session.total_points,
        max_possible_points: session.max_possible_points,
        total_rating_display: session.total_rating_display.clone(),
        average_rating: session.average_rating,
    }
}
