//! Answer scoring: pluggable, trait-based scorer for a single free-text answer.
//!
//! Default: `HeuristicScorer` (pure, deterministic, no I/O).
//! `InterviewEngine` holds an `Arc<dyn AnswerScorer>`.

use crate::models::interview::{ProficiencyLevel, POINTS_PER_QUESTION};

/// Score returned when the heuristic cannot produce a finite number.
pub const DEFAULT_SCORE: f64 = 5.0;

const BASE_SCORE: f64 = 5.0;
const SHORT_ANSWER_CHARS: usize = 50;
const LONG_ANSWER_CHARS: usize = 200;
const SHORT_ANSWER_PENALTY: f64 = 2.0;
const LONG_ANSWER_BONUS: f64 = 1.0;
const CODE_PATTERN_BONUS: f64 = 0.5;

/// Technical-depth vocabulary, matched case-insensitively, each counted once.
const KEYWORD_WEIGHTS: &[(&str, f64)] = &[
    ("example", 0.5),
    ("experience", 0.5),
    ("project", 0.5),
    ("implementation", 1.0),
    ("architecture", 1.0),
    ("design", 0.5),
    ("solution", 0.5),
    ("problem", 0.5),
    ("optimize", 1.0),
    ("performance", 1.0),
    ("security", 1.0),
    ("testing", 1.0),
    ("debug", 0.5),
    ("framework", 0.5),
    ("library", 0.5),
    ("database", 0.5),
    ("api", 0.5),
    ("interface", 0.5),
    ("component", 0.5),
    ("system", 0.5),
];

/// Literal code fragments, matched case-sensitively against the raw answer.
const CODE_PATTERNS: &[&str] = &["return ", "if ", "for ", "while ", "try:", "{", "}", "()", "[]"];

/// The answer scorer trait. Implementations must never fail: scoring may not
/// block interview progression.
pub trait AnswerScorer: Send + Sync {
    /// Returns a score in `[0, 10]`.
    fn score(&self, answer: &str, technology: &str, proficiency: ProficiencyLevel) -> f64;
}

/// Length, vocabulary and code-shape heuristic scaled by declared proficiency.
pub struct HeuristicScorer;

impl AnswerScorer for HeuristicScorer {
    fn score(&self, answer: &str, _technology: &str, proficiency: ProficiencyLevel) -> f64 {
        let rating = heuristic_score(answer, proficiency);
        if rating.is_finite() {
            rating
        } else {
            DEFAULT_SCORE
        }
    }
}

fn heuristic_score(answer: &str, proficiency: ProficiencyLevel) -> f64 {
    let mut rating = BASE_SCORE;

    let length = answer.chars().count();
    if length < SHORT_ANSWER_CHARS {
        rating -= SHORT_ANSWER_PENALTY;
    } else if length > LONG_ANSWER_CHARS {
        rating += LONG_ANSWER_BONUS;
    }

    let answer_lower = answer.to_lowercase();
    rating += KEYWORD_WEIGHTS
        .iter()
        .filter(|(keyword, _)| answer_lower.contains(keyword))
        .map(|(_, weight)| weight)
        .sum::<f64>();

    rating += CODE_PATTERNS
        .iter()
        .filter(|pattern| answer.contains(*pattern))
        .count() as f64
        * CODE_PATTERN_BONUS;

    rating *= proficiency_multiplier(proficiency);

    rating.clamp(0.0, POINTS_PER_QUESTION)
}

fn proficiency_multiplier(proficiency: ProficiencyLevel) -> f64 {
    match proficiency {
        ProficiencyLevel::Advanced => 1.2,
        ProficiencyLevel::Intermediate => 1.0,
        ProficiencyLevel::Beginner => 0.8,
    }
}
