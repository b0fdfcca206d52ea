//! Question generation: generative backend first, static bank on any failure.
//!
//! Backend errors and rejected output are logged and absorbed here; callers
//! always receive a usable question.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::interview::cache::AskedQuestionCache;
use crate::interview::fallback::StaticBank;
use crate::llm_client::prompts::{follow_up_prompt, new_question_prompt};
use crate::llm_client::GenerativeBackend;
use crate::models::interview::TechPlanEntry;

/// Generated new questions must be longer than this many characters.
const MIN_NEW_QUESTION_CHARS: usize = 20;
/// Generated follow-ups must be longer than this many characters.
const MIN_FOLLOW_UP_CHARS: usize = 15;

const LABEL_PREFIXES: &[&str] = &["question:", "follow-up question:", "follow-up:", "followup:"];
const BULLET_PREFIXES: &[char] = &['-', '*', '•'];
const QUOTE_PAIRS: &[(char, char)] = &[('"', '"'), ('\'', '\''), ('“', '”')];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Initial,
    FollowUp,
    Final,
}

impl QuestionKind {
    fn min_chars(self) -> usize {
        match self {
            QuestionKind::FollowUp => MIN_FOLLOW_UP_CHARS,
            QuestionKind::Initial | QuestionKind::Final => MIN_NEW_QUESTION_CHARS,
        }
    }
}

pub struct QuestionGenerator {
    backend: Option<Arc<dyn GenerativeBackend>>,
    bank: StaticBank,
    asked: AskedQuestionCache,
}

impl QuestionGenerator {
    /// `backend = None` runs on the static bank alone.
    pub fn new(
        backend: Option<Arc<dyn GenerativeBackend>>,
        bank: StaticBank,
        asked: AskedQuestionCache,
    ) -> Self {
        Self {
            backend,
            bank,
            asked,
        }
    }

    pub async fn initial(&self, session_id: &str, tech: &TechPlanEntry) -> String {
        self.generate(session_id, QuestionKind::Initial, tech, None)
            .await
    }

    pub async fn follow_up(&self, session_id: &str, tech: &TechPlanEntry, answer: &str) -> String {
        self.generate(session_id, QuestionKind::FollowUp, tech, Some(answer))
            .await
    }

    pub async fn final_question(&self, session_id: &str, tech: &TechPlanEntry) -> String {
        self.generate(session_id, QuestionKind::Final, tech, None)
            .await
    }

    /// Drops everything remembered about a session.
    pub fn release(&self, session_id: &str) {
        self.asked.clear(session_id);
        debug!(
            "Released asked questions for {session_id} ({} sessions tracked)",
            self.asked.tracked_sessions()
        );
    }

    async fn generate(
        &self,
        session_id: &str,
        kind: QuestionKind,
        tech: &TechPlanEntry,
        answer: Option<&str>,
    ) -> String {
        let question = match self.try_backend(session_id, kind, tech, answer).await {
            Some(question) => question,
            None => self.from_bank(session_id, kind, tech, answer.unwrap_or_default()),
        };
        self.asked.record(session_id, &question);
        question
    }

    async fn try_backend(
        &self,
        session_id: &str,
        kind: QuestionKind,
        tech: &TechPlanEntry,
        answer: Option<&str>,
    ) -> Option<String> {
        let backend = self.backend.as_ref()?;
        let level = tech.proficiency.as_str();
        let prompt = match kind {
            QuestionKind::FollowUp => follow_up_prompt(&tech.name, level, answer.unwrap_or_default()),
            QuestionKind::Initial | QuestionKind::Final => new_question_prompt(&tech.name, level),
        };

        let raw = match backend.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("{kind:?} question for {} fell back to static bank: {e}", tech.name);
                return None;
            }
        };

        let question = clean_question(&raw);
        if !is_acceptable(&question, kind.min_chars()) {
            warn!(
                "{kind:?} question for {} rejected ({} chars): {question:?}",
                tech.name,
                question.chars().count()
            );
            return None;
        }
        if self.asked.was_asked(session_id, &question) {
            warn!("{kind:?} question for {} repeats an earlier one", tech.name);
            return None;
        }

        debug!("Using generated {kind:?} question for {}", tech.name);
        Some(question)
    }

    fn from_bank(&self, session_id: &str, kind: QuestionKind, tech: &TechPlanEntry, answer: &str) -> String {
        match kind {
            QuestionKind::FollowUp => self.bank.follow_up(&tech.name, answer),
            QuestionKind::Initial | QuestionKind::Final => {
                self.bank
                    .question(&tech.name, tech.proficiency, |q| self.asked.was_asked(session_id, q))
            }
        }
    }
}

/// Normalises raw backend output into a single question line.
///
/// Takes the first non-empty line, strips leading labels, list numbering and
/// bullets, removes one fully-wrapping pair of quotes, and ensures a trailing `?`.
pub fn clean_question(raw: &str) -> String {
    let Some(first_line) = raw.lines().map(str::trim).find(|line| !line.is_empty()) else {
        return String::new();
    };

    let mut question = first_line;
    loop {
        let stripped = strip_marker(question).trim();
        if stripped == question {
            break;
        }
        question = stripped;
    }

    let question = strip_wrapping_quotes(question).trim();
    let mut question = question.to_string();
    if !question.is_empty() && !question.ends_with('?') {
        question.push('?');
    }
    question
}

/// Removes one leading label (`Question:`), numbering (`1.`, `2)`) or bullet.
fn strip_marker(text: &str) -> &str {
    for label in LABEL_PREFIXES {
        if text.len() >= label.len()
            && text.is_char_boundary(label.len())
            && text[..label.len()].eq_ignore_ascii_case(label)
        {
            return &text[label.len()..];
        }
    }

    let digits = text.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &text[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest;
        }
    }

    text.strip_prefix(BULLET_PREFIXES).unwrap_or(text)
}

fn strip_wrapping_quotes(text: &str) -> &str {
    for (open, close) in QUOTE_PAIRS {
        if text.chars().count() >= 2 {
            if let Some(inner) = text.strip_prefix(*open).and_then(|t| t.strip_suffix(*close)) {
                return inner;
            }
        }
    }
    text
}

fn is_acceptable(question: &str, min_chars: usize) -> bool {
    question.chars().count() > min_chars && question.ends_with('?')
}
