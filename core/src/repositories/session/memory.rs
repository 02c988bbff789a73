//! In-memory implementation of `OtpSessionRepository`.
//!
//! Backs the unit tests and local development. All mutations take the
//! write lock for their full read-modify-write span, which gives this
//! store the same atomicity guarantees the trait demands of real
//! implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::otp_session::OtpSession;
use crate::errors::{OtpError, OtpResult};

use super::r#trait::OtpSessionRepository;

/// In-memory session repository keyed by session token
pub struct MemoryOtpSessionRepository {
    sessions: Arc<RwLock<HashMap<String, OtpSession>>>,
    fail: AtomicBool,
}

impl MemoryOtpSessionRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            fail: AtomicBool::new(false),
        }
    }

    /// Toggle simulated storage failure; every subsequent call returns
    /// `OtpError::Persistence` until switched off again.
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Number of sessions currently held, regardless of state.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    fn check_available(&self) -> OtpResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(OtpError::Persistence {
                message: "session store unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MemoryOtpSessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpSessionRepository for MemoryOtpSessionRepository {
    async fn create_session(&self, session: OtpSession) -> OtpResult<OtpSession> {
        self.check_available()?;
        let mut sessions = self.sessions.write().await;

        // Delete-then-insert under one lock scope: at most one session
        // per user survives.
        sessions.retain(|_, s| s.user_id != session.user_id);
        sessions.insert(session.session_token.clone(), session.clone());

        Ok(session)
    }

    async fn find_active(&self, session_token: &str) -> OtpResult<Option<OtpSession>> {
        self.check_available()?;
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session_token)
            .filter(|s| !s.verified && !s.is_expired())
            .cloned())
    }

    async fn find_unverified(&self, session_token: &str) -> OtpResult<Option<OtpSession>> {
        self.check_available()?;
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session_token)
            .filter(|s| !s.verified)
            .cloned())
    }

    async fn find_by_token(&self, session_token: &str) -> OtpResult<Option<OtpSession>> {
        self.check_available()?;
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_token).cloned())
    }

    async fn increment_attempts(&self, session_token: &str) -> OtpResult<Option<i32>> {
        self.check_available()?;
        let mut sessions = self.sessions.write().await;

        match sessions.get_mut(session_token) {
            Some(s) if !s.verified && s.attempts < s.max_attempts => {
                s.attempts += 1;
                Ok(Some(s.attempts))
            }
            _ => Ok(None),
        }
    }

    async fn mark_verified(&self, session_token: &str) -> OtpResult<bool> {
        self.check_available()?;
        let mut sessions = self.sessions.write().await;

        match sessions.get_mut(session_token) {
            Some(s) if !s.verified => {
                s.verified = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn replace_code(
        &self,
        session_token: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> OtpResult<bool> {
        self.check_available()?;
        let mut sessions = self.sessions.write().await;

        match sessions.get_mut(session_token) {
            Some(s) if !s.verified => {
                s.code = code.to_string();
                s.attempts = 0;
                s.expires_at = expires_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, session_token: &str) -> OtpResult<bool> {
        self.check_available()?;
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(session_token).is_some())
    }

    async fn delete_expired(&self) -> OtpResult<usize> {
        self.check_available()?;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        Ok(before - sessions.len())
    }

    async fn list_active(&self) -> OtpResult<Vec<OtpSession>> {
        self.check_available()?;
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|s| !s.verified && !s.is_expired())
            .cloned()
            .collect())
    }
}
