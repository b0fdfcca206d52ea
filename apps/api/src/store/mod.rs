//! Storage contracts for interview sessions and candidate profiles.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::models::interview::{
    AnswerRating, ConversationMessage, InterviewSession, SessionStatus, TechPlanEntry,
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// Aggregate score fields, always written together.
#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub total_points: f64,
    pub max_possible_points: f64,
    pub total_rating_display: String,
    pub average_rating: Option<f64>,
}

/// Change to `paused_at`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PausedAt {
    Set(DateTime<Utc>),
    Clear,
}

/// One combined session mutation. A store applies every part of it or none.
///
/// Vectors are appended in order; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub append_messages: Vec<ConversationMessage>,
    pub append_ratings: Vec<AnswerRating>,
    pub totals: Option<Totals>,
    pub tech_plan: Option<Vec<TechPlanEntry>>,
    pub current_tech_index: Option<usize>,
    pub status: Option<SessionStatus>,
    pub completed_at: Option<DateTime<Utc>>,
    pub paused_at: Option<PausedAt>,
}

impl SessionUpdate {
    /// Applies the update to an in-memory copy of a session.
    pub fn apply_to(self, session: &mut InterviewSession) {
        session.conversation_history.extend(self.append_messages);
        session.answer_ratings.extend(self.append_ratings);
        if let Some(totals) = self.totals {
            session.total_points = totals.total_points;
            session.max_possible_points = totals.max_possible_points;
            session.total_rating_display = totals.total_rating_display;
            session.average_rating = totals.average_rating;
        }
        if let Some(plan) = self.tech_plan {
            session.tech_plan = plan;
        }
        if let Some(index) = self.current_tech_index {
            session.current_tech_index = index;
        }
        if let Some(status) = self.status {
            session.status = status;
        }
        if let Some(completed_at) = self.completed_at {
            session.completed_at = Some(completed_at);
        }
        match self.paused_at {
            Some(PausedAt::Set(at)) => session.paused_at = Some(at),
            Some(PausedAt::Clear) => session.paused_at = None,
            None => {}
        }
    }
}

/// Durable keyed session storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: &InterviewSession) -> Result<(), AppError>;

    async fn get(&self, session_id: &str) -> Result<Option<InterviewSession>, AppError>;

    /// Atomically applies `update`. Fails with `NotFound` for an unknown id.
    async fn apply(&self, session_id: &str, update: SessionUpdate) -> Result<(), AppError>;
}

/// Read-only candidate lookup.
#[async_trait]
pub trait CandidateDirectory: Send + Sync {
    async fn get(&self, candidate_id: &str) -> Result<Option<Candidate>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interview::ProficiencyLevel;

    #[test]
    fn test_default_update_changes_nothing() {
        let plan = vec![TechPlanEntry::new("Go", ProficiencyLevel::Beginner)];
        let mut session = InterviewSession::new("s".into(), "c".into(), plan);
        let before = session.clone();
        SessionUpdate::default().apply_to(&mut session);
        assert_eq!(session, before);
    }

    #[test]
    fn test_apply_to_appends_and_sets() {
        let plan = vec![TechPlanEntry::new("Go", ProficiencyLevel::Beginner)];
        let mut session = InterviewSession::new("s".into(), "c".into(), plan);
        session.paused_at = Some(Utc::now());

        SessionUpdate {
            append_messages: vec![
                ConversationMessage::user("a", None),
                ConversationMessage::assistant("b", None),
            ],
            totals: Some(Totals {
                total_points: 4.0,
                max_possible_points: 10.0,
                total_rating_display: "4/10".into(),
                average_rating: Some(4.0),
            }),
            current_tech_index: Some(1),
            status: Some(SessionStatus::Completed),
            paused_at: Some(PausedAt::Clear),
            ..Default::default()
        }
        .apply_to(&mut session);

        assert_eq!(session.conversation_history.len(), 2);
        assert_eq!(session.conversation_history[1].content, "b");
        assert_eq!(session.total_rating_display, "4/10");
        assert_eq!(session.current_tech_index, 1);
        assert_eq!(session.status, SessionStatus::Completed);
        assert!(session.paused_at.is_none());
    }
}
