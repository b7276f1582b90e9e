pub mod postgres;

#[cfg(test)]
pub mod memory;

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use crate::models::session::{LogEntry, WorkoutSession};
use crate::models::user::User;

/// Opaque store failure. The lifecycle surfaces these as internal errors,
/// except for the finish-time user-stat increment where they are only
/// logged.
#[derive(Debug)]
pub struct StoreError(pub String);

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError(err.to_string())
    }
}

/// Document-store operations the session lifecycle depends on. Passed
/// explicitly so tests can substitute an in-memory double; all state lives
/// behind the store, never in the lifecycle.
pub trait SessionStore: Send + Sync {
    async fn insert_session(&self, session: &WorkoutSession) -> Result<(), StoreError>;

    /// Atomically append one log entry. Returns false when the session
    /// does not exist; the entry is then not persisted anywhere.
    async fn append_log(&self, session_id: Uuid, entry: &LogEntry) -> Result<bool, StoreError>;

    /// Set `finished_at` and return the updated session. Unconditional:
    /// a second call overwrites the previous timestamp.
    async fn finish_session(
        &self,
        session_id: Uuid,
        finished_at: DateTime<Utc>,
    ) -> Result<Option<WorkoutSession>, StoreError>;

    /// Most recent program-origin session for a user, ordered by
    /// `finished_at` descending with nulls last, then `started_at`
    /// descending.
    async fn latest_program_session(&self, uid: &str)
        -> Result<Option<WorkoutSession>, StoreError>;

    /// Atomic add-to-current-value: `calories_burned += calories`,
    /// `workouts_done += 1`.
    async fn increment_user_stats(&self, uid: &str, calories: f64) -> Result<(), StoreError>;

    /// Returns false when the uid is already taken.
    async fn insert_user(&self, user: &User) -> Result<bool, StoreError>;

    async fn find_user(&self, uid: &str) -> Result<Option<User>, StoreError>;
}
