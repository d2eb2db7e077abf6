//! Session repository trait.
//!
//! Defines the interface for session persistence operations.

use super::model::Session;
use crate::error::{PrepError, Result};
use async_trait::async_trait;

/// An abstract repository for managing session persistence.
///
/// This trait defines the contract for persisting and retrieving sessions,
/// decoupling the application's core logic from the specific storage mechanism
/// (e.g., TOML files, database, remote API).
///
/// # Implementation Notes
///
/// Implementations must guarantee:
/// - A `save` is atomic per session: a concurrent `find_by_id` sees either the
///   previous record or the new one, never a partial write
/// - Access to different session ids may proceed concurrently
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds a session by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: Session found
    /// - `Ok(None)`: Session not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>>;

    /// Saves a session to storage, replacing any previous record with the same id.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the record could not be written.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Deletes a session from storage.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Session deleted successfully (or didn't exist)
    /// - `Err(_)`: Error occurred during deletion
    async fn delete(&self, session_id: &str) -> Result<()>;

    /// Lists all stored sessions, oldest first.
    async fn list_all(&self) -> Result<Vec<Session>>;

    /// Loads a session, failing with `NotFound` if it does not exist.
    async fn load(&self, session_id: &str) -> Result<Session> {
        self.find_by_id(session_id)
            .await?
            .ok_or_else(|| PrepError::not_found("session", session_id))
    }

    /// Lists the ids of all stored sessions ordered by creation time (oldest first).
    async fn list_ids(&self) -> Result<Vec<String>> {
        let mut sessions = self.list_all().await?;
        sort_by_creation(&mut sessions);
        Ok(sessions.into_iter().map(|s| s.id).collect())
    }
}

/// Sorts sessions by creation time, oldest first; equal timestamps by id.
pub fn sort_by_creation(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
