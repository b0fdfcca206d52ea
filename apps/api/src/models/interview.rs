use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of questions asked per technology before the plan advances.
pub const QUESTIONS_PER_TECH: u8 = 3;

/// Points available for a single answered question.
pub const POINTS_PER_QUESTION: f64 = 10.0;

/// Declared proficiency for a technology. Drives the scoring multiplier and
/// the curated question set used by the fallback bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ProficiencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProficiencyLevel::Beginner => "Beginner",
            ProficiencyLevel::Intermediate => "Intermediate",
            ProficiencyLevel::Advanced => "Advanced",
        }
    }

    /// Case-insensitive parse of a stored proficiency label.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(ProficiencyLevel::Beginner),
            "intermediate" => Some(ProficiencyLevel::Intermediate),
            "advanced" => Some(ProficiencyLevel::Advanced),
            _ => None,
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One technology in the interview plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechPlanEntry {
    pub name: String,
    pub proficiency: ProficiencyLevel,
    pub questions_asked: u8,
    pub completed: bool,
}

impl TechPlanEntry {
    pub fn new(name: impl Into<String>, proficiency: ProficiencyLevel) -> Self {
        Self {
            name: name.into(),
            proficiency,
            questions_asked: 0,
            completed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single chat turn. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub technology: Option<String>,
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>, technology: Option<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: Utc::now(),
            technology,
        }
    }

    pub fn assistant(content: impl Into<String>, technology: Option<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            technology,
        }
    }
}

/// Score recorded for one answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRating {
    pub technology: String,
    /// 1-based position of the answered question within its technology.
    pub question_number: u8,
    pub rating: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    /// Label only; answers are still accepted while paused.
    Paused,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Paused => "paused",
            SessionStatus::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "active" => Some(SessionStatus::Active),
            "paused" => Some(SessionStatus::Paused),
            "completed" => Some(SessionStatus::Completed),
            _ => None,
        }
    }
}

/// Full mutable record of one interview run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSession {
    pub session_id: String,
    pub candidate_id: String,
    pub status: SessionStatus,
    pub tech_plan: Vec<TechPlanEntry>,
    pub current_tech_index: usize,
    pub conversation_history: Vec<ConversationMessage>,
    pub answer_ratings: Vec<AnswerRating>,
    pub total_points: f64,
    pub max_possible_points: f64,
    pub total_rating_display: String,
    pub average_rating: Option<f64>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub paused_at: Option<DateTime<Utc>>,
}

impl InterviewSession {
    pub fn new(session_id: String, candidate_id: String, tech_plan: Vec<TechPlanEntry>) -> Self {
        Self {
            session_id,
            candidate_id,
            status: SessionStatus::Active,
            tech_plan,
            current_tech_index: 0,
            conversation_history: Vec::new(),
            answer_ratings: Vec::new(),
            total_points: 0.0,
            max_possible_points: 0.0,
            total_rating_display: rating_display(0.0, 0.0),
            average_rating: None,
            started_at: Utc::now(),
            completed_at: None,
            paused_at: None,
        }
    }

    /// The technology currently being asked about, `None` once the plan is exhausted.
    pub fn current_tech(&self) -> Option<&TechPlanEntry> {
        self.tech_plan.get(self.current_tech_index)
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }
}

/// Points display such as `"11/30"`. Rounds half to even.
pub fn rating_display(total_points: f64, max_possible_points: f64) -> String {
    format!(
        "{}/{}",
        total_points.round_ties_even() as i64,
        max_possible_points.round_ties_even() as i64
    )
}

/// Average on a 0–10 scale, `None` before the first answer.
pub fn average_rating(total_points: f64, max_possible_points: f64) -> Option<f64> {
    if max_possible_points > 0.0 {
        Some(total_points / max_possible_points * 10.0)
    } else {
        None
    }
}
