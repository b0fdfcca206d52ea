//! Per-session record of questions already put to the candidate.
//!
//! Process-local and bounded: once `capacity` sessions are tracked, the session
//! recorded least recently for the first time is evicted.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct CacheInner {
    sessions: HashMap<String, HashSet<String>>,
    order: VecDeque<String>,
}

#[derive(Debug)]
pub struct AskedQuestionCache {
    inner: Mutex<CacheInner>,
    capacity: usize,
}

impl AskedQuestionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record(&self, session_id: &str, question: &str) {
        let mut inner = self.lock();
        if !inner.sessions.contains_key(session_id) {
            while inner.order.len() >= self.capacity {
                if let Some(oldest) = inner.order.pop_front() {
                    inner.sessions.remove(&oldest);
                }
            }
            inner.order.push_back(session_id.to_string());
        }
        inner
            .sessions
            .entry(session_id.to_string())
            .or_default()
            .insert(question_key(question));
    }

    pub fn was_asked(&self, session_id: &str, question: &str) -> bool {
        self.lock()
            .sessions
            .get(session_id)
            .is_some_and(|asked| asked.contains(&question_key(question)))
    }

    pub fn clear(&self, session_id: &str) {
        let mut inner = self.lock();
        if inner.sessions.remove(session_id).is_some() {
            inner.order.retain(|id| id != session_id);
        }
    }

    pub fn tracked_sessions(&self) -> usize {
        self.lock().sessions.len()
    }
}

/// Case- and whitespace-insensitive identity of a question.
fn question_key(question: &str) -> String {
    question
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
