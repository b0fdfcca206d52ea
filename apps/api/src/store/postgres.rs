//! PostgreSQL backends. Session arrays live in JSONB columns so a combined
//! update is a single `UPDATE` statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use crate::errors::AppError;
use crate::models::candidate::{Candidate, TechStackCategory};
use crate::models::interview::{
    AnswerRating, ConversationMessage, InterviewSession, SessionStatus, TechPlanEntry,
};
use crate::store::{CandidateDirectory, PausedAt, SessionStore, SessionUpdate};

#[derive(Debug, FromRow)]
struct SessionRow {
    session_id: String,
    candidate_id: String,
    status: String,
    tech_plan: Json<Vec<TechPlanEntry>>,
    current_tech_index: i32,
    conversation_history: Json<Vec<ConversationMessage>>,
    answer_ratings: Json<Vec<AnswerRating>>,
    total_points: f64,
    max_possible_points: f64,
    total_rating_display: String,
    average_rating: Option<f64>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    paused_at: Option<DateTime<Utc>>,
}

impl TryFrom<SessionRow> for InterviewSession {
    type Error = AppError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let status = SessionStatus::parse(&row.status).ok_or_else(|| {
            AppError::Persistence(format!(
                "Session {} has unknown status {:?}",
                row.session_id, row.status
            ))
        })?;
        let current_tech_index = usize::try_from(row.current_tech_index).map_err(|_| {
            AppError::Persistence(format!(
                "Session {} has negative tech index {}",
                row.session_id, row.current_tech_index
            ))
        })?;

        Ok(InterviewSession {
            session_id: row.session_id,
            candidate_id: row.candidate_id,
            status,
            tech_plan: row.tech_plan.0,
            current_tech_index,
            conversation_history: row.conversation_history.0,
            answer_ratings: row.answer_ratings.0,
            total_points: row.total_points,
            max_possible_points: row.max_possible_points,
            total_rating_display: row.total_rating_display,
            average_rating: row.average_rating,
            started_at: row.started_at,
            completed_at: row.completed_at,
            paused_at: row.paused_at,
        })
    }
}

fn index_to_db(index: usize) -> Result<i32, AppError> {
    i32::try_from(index)
        .map_err(|_| AppError::Persistence(format!("Tech index {index} out of range")))
}

#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, session: &InterviewSession) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO interview_sessions
                (session_id, candidate_id, status, tech_plan, current_tech_index,
                 conversation_history, answer_ratings, total_points, max_possible_points,
                 total_rating_display, average_rating, started_at, completed_at, paused_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(&session.session_id)
        .bind(&session.candidate_id)
        .bind(session.status.as_str())
        .bind(Json(&session.tech_plan))
        .bind(index_to_db(session.current_tech_index)?)
        .bind(Json(&session.conversation_history))
        .bind(Json(&session.answer_ratings))
        .bind(session.total_points)
        .bind(session.max_possible_points)
        .bind(&session.total_rating_display)
        .bind(session.average_rating)
        .bind(session.started_at)
        .bind(session.completed_at)
        .bind(session.paused_at)
        .execute(&self.pool)
        .await?;

        debug!("Inserted interview session {}", session.session_id);
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<InterviewSession>, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT session_id, candidate_id, status, tech_plan, current_tech_index,
                   conversation_history, answer_ratings, total_points, max_possible_points,
                   total_rating_display, average_rating, started_at, completed_at, paused_at
            FROM interview_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(InterviewSession::try_from).transpose()
    }

    /// One statement: JSONB concatenation for the appended arrays, `COALESCE`
    /// for optional scalars.
    async fn apply(&self, session_id: &str, update: SessionUpdate) -> Result<(), AppError> {
        let totals = update.totals.as_ref();
        let current_tech_index = update.current_tech_index.map(index_to_db).transpose()?;
        let (paused_at, clear_paused) = match update.paused_at {
            Some(PausedAt::Set(at)) => (Some(at), false),
            Some(PausedAt::Clear) => (None, true),
            None => (None, false),
        };

        let result = sqlx::query(
            r#"
            UPDATE interview_sessions SET
                conversation_history = conversation_history || $2,
                answer_ratings       = answer_ratings || $3,
                total_points         = COALESCE($4, total_points),
                max_possible_points  = COALESCE($5, max_possible_points),
                total_rating_display = COALESCE($6, total_rating_display),
                average_rating       = COALESCE($7, average_rating),
                tech_plan            = COALESCE($8, tech_plan),
                current_tech_index   = COALESCE($9, current_tech_index),
                status               = COALESCE($10, status),
                completed_at         = COALESCE($11, completed_at),
                paused_at            = CASE WHEN $13 THEN NULL ELSE COALESCE($12, paused_at) END
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .bind(Json(&update.append_messages))
        .bind(Json(&update.append_ratings))
        .bind(totals.map(|t| t.total_points))
        .bind(totals.map(|t| t.max_possible_points))
        .bind(totals.map(|t| t.total_rating_display.as_str()))
        .bind(totals.and_then(|t| t.average_rating))
        .bind(update.tech_plan.as_ref().map(Json))
        .bind(current_tech_index)
        .bind(update.status.map(|s| s.as_str()))
        .bind(update.completed_at)
        .bind(paused_at)
        .bind(clear_paused)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Session {session_id} not found")));
        }
        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct CandidateRow {
    candidate_id: String,
    full_name: String,
    email: String,
    phone_number: String,
    years_experience: i32,
    desired_positions: Vec<String>,
    current_location: String,
    tech_stack: Json<Vec<TechStackCategory>>,
    created_at: DateTime<Utc>,
}

impl From<CandidateRow> for Candidate {
    fn from(row: CandidateRow) -> Self {
        Candidate {
            candidate_id: row.candidate_id,
            full_name: row.full_name,
            email: row.email,
            phone_number: row.phone_number,
            years_experience: row.years_experience,
            desired_positions: row.desired_positions,
            current_location: row.current_location,
            tech_stack: row.tech_stack.0,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PgCandidateDirectory {
    pool: PgPool,
}

impl PgCandidateDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateDirectory for PgCandidateDirectory {
    async fn get(&self, candidate_id: &str) -> Result<Option<Candidate>, AppError> {
        let row = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT candidate_id, full_name, email, phone_number, years_experience,
                   desired_positions, current_location, tech_stack, created_at
            FROM candidates
            WHERE candidate_id = $1
            "#,
        )
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Candidate::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interview::ProficiencyLevel;

    fn row(status: &str, index: i32) -> SessionRow {
        SessionRow {
            session_id: "s1".to_string(),
            candidate_id: "c1".to_string(),
            status: status.to_string(),
            tech_plan: Json(vec![TechPlanEntry::new("Rust", ProficiencyLevel::Advanced)]),
            current_tech_index: index,
            conversation_history: Json(vec![]),
            answer_ratings: Json(vec![]),
            total_points: 3.6,
            max_possible_points: 10.0,
            total_rating_display: "4/10".to_string(),
            average_rating: Some(3.6),
            started_at: Utc::now(),
            completed_at: None,
            paused_at: None,
        }
    }

    #[test]
    fn test_row_converts_to_session() {
        let session = InterviewSession::try_from(row("paused", 0)).unwrap();
        assert_eq!(session.status, SessionStatus::Paused);
        assert_eq!(session.tech_plan[0].name, "Rust");
        assert_eq!(session.total_rating_display, "4/10");
    }

    #[test]
    fn test_unknown_status_is_persistence_error() {
        let err = InterviewSession::try_from(row("archived", 0)).unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
    }

    #[test]
    fn test_negative_index_is_persistence_error() {
        let err = InterviewSession::try_from(row("active", -1)).unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
    }

    #[test]
    fn test_index_to_db_bounds() {
        assert_eq!(index_to_db(3).unwrap(), 3);
        assert!(index_to_db(usize::MAX).is_err());
    }
}
