//! In-memory storage backends used by the engine and router tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::models::interview::InterviewSession;
use crate::store::{CandidateDirectory, SessionStore, SessionUpdate};

fn poisoned<E>(_: E) -> AppError {
    AppError::Persistence("in-memory store lock poisoned".to_string())
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, InterviewSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or_default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: &InterviewSession) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        if sessions.contains_key(&session.session_id) {
            return Err(AppError::Persistence(format!(
                "Session {} already exists",
                session.session_id
            )));
        }
        sessions.insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<InterviewSession>, AppError> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions.get(session_id).cloned())
    }

    async fn apply(&self, session_id: &str, update: SessionUpdate) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
        update.apply_to(session);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryCandidateDirectory {
    candidates: RwLock<HashMap<String, Candidate>>,
}

impl MemoryCandidateDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, candidate: Candidate) -> Result<(), AppError> {
        let mut candidates = self.candidates.write().map_err(poisoned)?;
        candidates.insert(candidate.candidate_id.clone(), candidate);
        Ok(())
    }
}

#[async_trait]
impl CandidateDirectory for MemoryCandidateDirectory {
    async fn get(&self, candidate_id: &str) -> Result<Option<Candidate>, AppError> {
        let candidates = self.candidates.read().map_err(poisoned)?;
        Ok(candidates.get(candidate_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interview::{ConversationMessage, ProficiencyLevel, TechPlanEntry};

    fn session(id: &str) -> InterviewSession {
        InterviewSession::new(
            id.to_string(),
            "cand-1".to_string(),
            vec![TechPlanEntry::new("Rust", ProficiencyLevel::Intermediate)],
        )
    }

    #[tokio::test]
    async fn test_get_missing_session() {
        let store = MemorySessionStore::new();
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let store = MemorySessionStore::new();
        store.create(&session("s1")).await.unwrap();
        let loaded = store.get("s1").await.unwrap().unwrap();
        assert_eq!(loaded.candidate_id, "cand-1");
    }

    #[tokio::test]
    async fn test_duplicate_create_is_rejected() {
        let store = MemorySessionStore::new();
        store.create(&session("s1")).await.unwrap();
        let err = store.create(&session("s1")).await.unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_apply_to_unknown_session_is_not_found() {
        let store = MemorySessionStore::new();
        let err = store
            .apply("ghost", SessionUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_apply_appends_messages_in_order() {
        let store = MemorySessionStore::new();
        store.create(&session("s1")).await.unwrap();
        store
            .apply(
                "s1",
                SessionUpdate {
                    append_messages: vec![
                        ConversationMessage::user("first", None),
                        ConversationMessage::assistant("second", None),
                    ],
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let loaded = store.get("s1").await.unwrap().unwrap();
        let contents: Vec<&str> = loaded
            .conversation_history
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, ["first", "second"]);
    }
}
