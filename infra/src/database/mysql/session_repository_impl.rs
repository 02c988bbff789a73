//! MySQL implementation of the `OtpSessionRepository` trait.
//!
//! Atomicity obligations are pushed into SQL:
//! - `create_session` wraps delete-by-user + insert in one transaction,
//!   so concurrent creates for the same user cannot both leave a live
//!   session behind.
//! - `increment_attempts` is a guarded `UPDATE ... attempts = attempts + 1
//!   WHERE attempts < max_attempts`; the row lock held inside the
//!   transaction makes the subsequent counter read consistent.
//!
//! The `expires_at` index supports both the active-session predicates and
//! the expiry sweep; a storage-side purge event can mirror the sweep
//! without changing the semantics here, since `find_active` re-checks the
//! deadline on every lookup.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use tx_core::domain::entities::otp_session::OtpSession;
use tx_core::errors::{OtpError, OtpResult};
use tx_core::repositories::OtpSessionRepository;

/// MySQL-backed session repository
pub struct MySqlOtpSessionRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlOtpSessionRepository {
    /// Create a new MySQL session repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to an `OtpSession` entity
    fn row_to_session(row: &sqlx::mysql::MySqlRow) -> OtpResult<OtpSession> {
        Ok(OtpSession {
            session_token: row
                .try_get("session_token")
                .map_err(OtpError::persistence)?,
            user_id: row.try_get("user_id").map_err(OtpError::persistence)?,
            user_contact: row.try_get("user_contact").map_err(OtpError::persistence)?,
            staged_payload: row
                .try_get::<serde_json::Value, _>("staged_payload")
                .map_err(OtpError::persistence)?,
            code: row.try_get("code").map_err(OtpError::persistence)?,
            attempts: row.try_get("attempts").map_err(OtpError::persistence)?,
            max_attempts: row.try_get("max_attempts").map_err(OtpError::persistence)?,
            verified: row.try_get("verified").map_err(OtpError::persistence)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(OtpError::persistence)?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(OtpError::persistence)?,
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT session_token, user_id, user_contact, staged_payload, code,
           attempts, max_attempts, verified, created_at, expires_at
    FROM otp_sessions
"#;

#[async_trait]
impl OtpSessionRepository for MySqlOtpSessionRepository {
    async fn create_session(&self, session: OtpSession) -> OtpResult<OtpSession> {
        let mut tx = self.pool.begin().await.map_err(OtpError::persistence)?;

        sqlx::query("DELETE FROM otp_sessions WHERE user_id = ?")
            .bind(&session.user_id)
            .execute(&mut *tx)
            .await
            .map_err(OtpError::persistence)?;

        sqlx::query(
            r#"
            INSERT INTO otp_sessions (
                session_token, user_id, user_contact, staged_payload, code,
                attempts, max_attempts, verified, created_at, expires_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.session_token)
        .bind(&session.user_id)
        .bind(&session.user_contact)
        .bind(&session.staged_payload)
        .bind(&session.code)
        .bind(session.attempts)
        .bind(session.max_attempts)
        .bind(session.verified)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&mut *tx)
        .await
        .map_err(OtpError::persistence)?;

        tx.commit().await.map_err(OtpError::persistence)?;

        Ok(session)
    }

    async fn find_active(&self, session_token: &str) -> OtpResult<Option<OtpSession>> {
        let query = format!(
            "{SELECT_COLUMNS} WHERE session_token = ? AND verified = FALSE AND expires_at > ? LIMIT 1"
        );

        let result = sqlx::query(&query)
            .bind(session_token)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(OtpError::persistence)?;

        result.map(|row| Self::row_to_session(&row)).transpose()
    }

    async fn find_unverified(&self, session_token: &str) -> OtpResult<Option<OtpSession>> {
        let query = format!("{SELECT_COLUMNS} WHERE session_token = ? AND verified = FALSE LIMIT 1");

        let result = sqlx::query(&query)
            .bind(session_token)
            .fetch_optional(&self.pool)
            .await
            .map_err(OtpError::persistence)?;

        result.map(|row| Self::row_to_session(&row)).transpose()
    }

    async fn find_by_token(&self, session_token: &str) -> OtpResult<Option<OtpSession>> {
        let query = format!("{SELECT_COLUMNS} WHERE session_token = ? LIMIT 1");

        let result = sqlx::query(&query)
            .bind(session_token)
            .fetch_optional(&self.pool)
            .await
            .map_err(OtpError::persistence)?;

        result.map(|row| Self::row_to_session(&row)).transpose()
    }

    async fn increment_attempts(&self, session_token: &str) -> OtpResult<Option<i32>> {
        let mut tx = self.pool.begin().await.map_err(OtpError::persistence)?;

        let updated = sqlx::query(
            r#"
            UPDATE otp_sessions
            SET attempts = attempts + 1
            WHERE session_token = ? AND verified = FALSE AND attempts < max_attempts
            "#,
        )
        .bind(session_token)
        .execute(&mut *tx)
        .await
        .map_err(OtpError::persistence)?;

        if updated.rows_affected() == 0 {
            tx.rollback().await.map_err(OtpError::persistence)?;
            return Ok(None);
        }

        // Still inside the transaction that holds the row lock, so this
        // reads the value our own increment produced.
        let row = sqlx::query("SELECT attempts FROM otp_sessions WHERE session_token = ?")
            .bind(session_token)
            .fetch_one(&mut *tx)
            .await
            .map_err(OtpError::persistence)?;

        let attempts: i32 = row.try_get("attempts").map_err(OtpError::persistence)?;

        tx.commit().await.map_err(OtpError::persistence)?;

        Ok(Some(attempts))
    }

    async fn mark_verified(&self, session_token: &str) -> OtpResult<bool> {
        let result = sqlx::query(
            "UPDATE otp_sessions SET verified = TRUE WHERE session_token = ? AND verified = FALSE",
        )
        .bind(session_token)
        .execute(&self.pool)
        .await
        .map_err(OtpError::persistence)?;

        Ok(result.rows_affected() > 0)
    }

    async fn replace_code(
        &self,
        session_token: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> OtpResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE otp_sessions
            SET code = ?, attempts = 0, expires_at = ?
            WHERE session_token = ? AND verified = FALSE
            "#,
        )
        .bind(code)
        .bind(expires_at)
        .bind(session_token)
        .execute(&self.pool)
        .await
        .map_err(OtpError::persistence)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, session_token: &str) -> OtpResult<bool> {
        let result = sqlx::query("DELETE FROM otp_sessions WHERE session_token = ?")
            .bind(session_token)
            .execute(&self.pool)
            .await
            .map_err(OtpError::persistence)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self) -> OtpResult<usize> {
        let result = sqlx::query("DELETE FROM otp_sessions WHERE expires_at < ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(OtpError::persistence)?;

        Ok(result.rows_affected() as usize)
    }

    async fn list_active(&self) -> OtpResult<Vec<OtpSession>> {
        let query = format!(
            "{SELECT_COLUMNS} WHERE verified = FALSE AND expires_at > ? ORDER BY created_at DESC"
        );

        let rows = sqlx::query(&query)
            .bind(Utc::now())
            .fetch_all(&self.pool)
            .await
            .map_err(OtpError::persistence)?;

        let mut sessions = Vec::with_capacity(rows.len());
        for row in rows {
            sessions.push(Self::row_to_session(&row)?);
        }

        Ok(sessions)
    }
}
