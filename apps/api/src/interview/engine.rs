//! Interview state machine: orchestrates plan building, question generation and
//! scoring, and persists every transition as one combined session update.
//!
//! Flow: start_interview → (process_answer × 3 per technology) → completion.
//!
//! Callers must serialise `process_answer` calls per session id; the engine
//! performs no locking of its own.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::plan::build_tech_plan;
use crate::interview::questions::QuestionGenerator;
use crate::interview::scoring::AnswerScorer;
use crate::interview::summary::{summarize, SessionSummary};
use crate::models::interview::{
    average_rating, rating_display, AnswerRating, ConversationMessage, InterviewSession,
    SessionStatus, TechPlanEntry, POINTS_PER_QUESTION, QUESTIONS_PER_TECH,
};
use crate::store::{CandidateDirectory, PausedAt, SessionStore, SessionUpdate, Totals};

pub const COMPLETION_MESSAGE: &str = "**Interview Complete!**

You've successfully completed the technical interview.

**What's Next:**
- Technical team review (2-3 business days)
- Detailed feedback via email
- Potential follow-up discussion

**Thank you for your time!**";

/// What the candidate sees after submitting an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerReply {
    pub reply: String,
    pub status: SessionStatus,
}

pub struct InterviewEngine {
    sessions: Arc<dyn SessionStore>,
    candidates: Arc<dyn CandidateDirectory>,
    questions: QuestionGenerator,
    scorer: Arc<dyn AnswerScorer>,
}

impl InterviewEngine {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        candidates: Arc<dyn CandidateDirectory>,
        questions: QuestionGenerator,
        scorer: Arc<dyn AnswerScorer>,
    ) -> Self {
        Self {
            sessions,
            candidates,
            questions,
            scorer,
        }
    }

    /// Creates a session for the candidate and asks the first question.
    /// Returns the new session id.
    pub async fn start_interview(&self, candidate_id: &str) -> Result<String, AppError> {
        let candidate = self
            .candidates
            .get(candidate_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

        let tech_plan = build_tech_plan(&candidate.tech_stack)?;
        let first = tech_plan.first().cloned().ok_or(AppError::EmptyPlan)?;

        let session_id = Uuid::new_v4().simple().to_string();
        self.questions.release(&session_id);

        let question = self.questions.initial(&session_id, &first).await;
        let welcome = welcome_message(&candidate.full_name, &tech_plan, &question);

        let mut session =
            InterviewSession::new(session_id.clone(), candidate_id.to_string(), tech_plan);
        session
            .conversation_history
            .push(ConversationMessage::assistant(welcome, Some(first.name.clone())));

        if let Err(e) = self.sessions.create(&session).await {
            self.questions.release(&session_id);
            return Err(e);
        }

        info!(
            "Started interview {session_id} for candidate {candidate_id}: {} technologies, first {}",
            session.tech_plan.len(),
            first.name
        );
        Ok(session_id)
    }

    /// Scores an answer, advances the plan and returns the next assistant message.
    pub async fn process_answer(&self, session_id: &str, text: &str) -> Result<AnswerReply, AppError> {
        let session = self.load(session_id).await?;

        if session.is_completed() {
            return self.complete(&session).await;
        }
        let Some(tech) = session.current_tech().cloned() else {
            return self.complete(&session).await;
        };
        let index = session.current_tech_index;
        let answered = tech.questions_asked.saturating_add(1);

        let rating = self.scorer.score(text, &tech.name, tech.proficiency);
        let total_points = session.total_points + rating;
        let max_possible_points = session.max_possible_points + POINTS_PER_QUESTION;
        debug!(
            "Session {session_id}: {} answer {answered} scored {rating:.2}",
            tech.name
        );

        let now = Utc::now();
        let mut update = SessionUpdate {
            append_messages: vec![ConversationMessage::user(text, Some(tech.name.clone()))],
            append_ratings: vec![AnswerRating {
                technology: tech.name.clone(),
                question_number: answered,
                rating,
                timestamp: now,
            }],
            totals: Some(Totals {
                total_points,
                max_possible_points,
                total_rating_display: rating_display(total_points, max_possible_points),
                average_rating: average_rating(total_points, max_possible_points),
            }),
            ..Default::default()
        };

        let mut plan = session.tech_plan.clone();
        if let Some(entry) = plan.get_mut(index) {
            entry.questions_asked = answered;
        }

        let (reply, reply_tech) = match answered {
            1 => {
                let question = self.questions.follow_up(session_id, &tech, text).await;
                (
                    format!("**Follow-up Question (2/{QUESTIONS_PER_TECH}):**\n\n{question}"),
                    Some(tech.name.clone()),
                )
            }
            2 => {
                let question = self.questions.final_question(session_id, &tech).await;
                (
                    format!("**Final Question ({QUESTIONS_PER_TECH}/{QUESTIONS_PER_TECH}):**\n\n{question}"),
                    Some(tech.name.clone()),
                )
            }
            _ => self
                .advance(session_id, &mut plan, index, &tech, &mut update, now)
                .await,
        };

        let completed = update.status == Some(SessionStatus::Completed);
        let status = if completed {
            SessionStatus::Completed
        } else {
            session.status
        };

        update.tech_plan = Some(plan);
        update
            .append_messages
            .push(ConversationMessage::assistant(reply.clone(), reply_tech));

        self.sessions.apply(session_id, update).await?;

        if completed {
            self.questions.release(session_id);
            info!(
                "Interview {session_id} completed: {}",
                rating_display(total_points, max_possible_points)
            );
        }

        Ok(AnswerReply { reply, status })
    }

    /// Marks the current technology done and either opens the next one or
    /// finishes the interview. Mutates `plan` and `update` in place.
    async fn advance(
        &self,
        session_id: &str,
        plan: &mut [TechPlanEntry],
        index: usize,
        finished: &TechPlanEntry,
        update: &mut SessionUpdate,
        now: DateTime<Utc>,
    ) -> (String, Option<String>) {
        if let Some(entry) = plan.get_mut(index) {
            entry.completed = true;
        }
        let next_index = index + 1;
        update.current_tech_index = Some(next_index);

        let next = match plan.get_mut(next_index) {
            Some(next) => {
                next.questions_asked = 0;
                next.clone()
            }
            None => {
                update.status = Some(SessionStatus::Completed);
                update.completed_at = Some(now);
                return (COMPLETION_MESSAGE.to_string(), None);
            }
        };

        let question = self.questions.initial(session_id, &next).await;
        let done = plan.iter().filter(|t| t.completed).count();
        info!(
            "Session {session_id}: {} complete ({done}/{}), moving to {}",
            finished.name,
            plan.len(),
            next.name
        );

        (
            transition_message(finished, &next, done, plan.len(), &question),
            Some(next.name),
        )
    }

    /// Completion transition. Idempotent: an already completed session is not
    /// written again.
    async fn complete(&self, session: &InterviewSession) -> Result<AnswerReply, AppError> {
        if !session.is_completed() {
            self.sessions
                .apply(
                    &session.session_id,
                    SessionUpdate {
                        status: Some(SessionStatus::Completed),
                        completed_at: Some(Utc::now()),
                        ..Default::default()
                    },
                )
                .await?;
            info!("Interview {} completed", session.session_id);
        }
        self.questions.release(&session.session_id);

        Ok(AnswerReply {
            reply: COMPLETION_MESSAGE.to_string(),
            status: SessionStatus::Completed,
        })
    }

    pub async fn get_session(&self, session_id: &str) -> Result<InterviewSession, AppError> {
        self.load(session_id).await
    }

    pub async fn session_summary(&self, session_id: &str) -> Result<SessionSummary, AppError> {
        let session = self.load(session_id).await?;
        Ok(summarize(&session, Utc::now()))
    }

    /// Labels an active session as paused. Other states are left as they are.
    pub async fn pause_session(&self, session_id: &str) -> Result<SessionStatus, AppError> {
        let session = self.load(session_id).await?;
        if session.status != SessionStatus::Active {
            return Ok(session.status);
        }

        self.sessions
            .apply(
                session_id,
                SessionUpdate {
                    status: Some(SessionStatus::Paused),
                    paused_at: Some(PausedAt::Set(Utc::now())),
                    ..Default::default()
                },
            )
            .await?;
        info!("Paused interview {session_id}");
        Ok(SessionStatus::Paused)
    }

    /// Returns true if the session was paused and is now active again.
    pub async fn resume_session(&self, session_id: &str) -> Result<bool, AppError> {
        let session = self.load(session_id).await?;
        if session.status != SessionStatus::Paused {
            return Ok(false);
        }

        self.sessions
            .apply(
                session_id,
                SessionUpdate {
                    status: Some(SessionStatus::Active),
                    paused_at: Some(PausedAt::Clear),
                    ..Default::default()
                },
            )
            .await?;
        info!("Resumed interview {session_id}");
        Ok(true)
    }

    async fn load(&self, session_id: &str) -> Result<InterviewSession, AppError> {
        self.sessions
            .get(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
    }
}

fn welcome_message(full_name: &str, plan: &[TechPlanEntry], question: &str) -> String {
    let names: Vec<&str> = plan.iter().map(|t| t.name.as_str()).collect();
    let noun = if plan.len() == 1 {
        "technology"
    } else {
        "technologies"
    };
    let (first_name, first_level) = plan
        .first()
        .map(|t| (t.name.as_str(), t.proficiency.as_str()))
        .unwrap_or_default();

    format!(
        "**Technical Interview Started**\n\n\
         Hello {full_name}! We'll cover **{count} {noun}**: {list}\n\n\
         **Starting with {first_name}** (Level: {first_level})\n\n\
         **Question 1/{QUESTIONS_PER_TECH}:** {question}",
        count = plan.len(),
        list = names.join(", "),
    )
}

fn transition_message(
    finished: &TechPlanEntry,
    next: &TechPlanEntry,
    done: usize,
    total: usize,
    question: &str,
) -> String {
    format!(
        "**{} Complete!**\n\n\
         **Progress:** {done}/{total} technologies completed\n\n\
         **Now discussing {}** (Level: {})\n\n\
         **Question 1/{QUESTIONS_PER_TECH}:** {question}",
        finished.name, next.name, next.proficiency,
    )
}
