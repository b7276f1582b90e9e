use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::session::{LogEntry, SessionOrigin, SessionSnapshot, WorkoutSession};
use crate::models::user::User;
use crate::store::{SessionStore, StoreError};

/// Postgres-backed store. Session documents keep their nested parts
/// (origin, snapshot, logs) in JSONB columns so appends and reads stay
/// whole-document, matching the document-store contract.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    uid: String,
    origin: Json<SessionOrigin>,
    snapshot: Json<SessionSnapshot>,
    total_exercises: Option<i64>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    logs: Json<Vec<LogEntry>>,
}

impl From<SessionRow> for WorkoutSession {
    fn from(row: SessionRow) -> Self {
        WorkoutSession {
            session_id: row.session_id,
            uid: row.uid,
            origin: row.origin.0,
            snapshot: row.snapshot.0,
            total_exercises: row.total_exercises,
            started_at: row.started_at,
            finished_at: row.finished_at,
            logs: row.logs.0,
        }
    }
}

impl SessionStore for PgStore {
    async fn insert_session(&self, session: &WorkoutSession) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO workout_sessions \
             (session_id, uid, origin, snapshot, total_exercises, started_at, finished_at, logs) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(session.session_id)
        .bind(&session.uid)
        .bind(Json(&session.origin))
        .bind(Json(&session.snapshot))
        .bind(session.total_exercises)
        .bind(session.started_at)
        .bind(session.finished_at)
        .bind(Json(&session.logs))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn append_log(&self, session_id: Uuid, entry: &LogEntry) -> Result<bool, StoreError> {
        // JSONB concatenation appends atomically under concurrent writers.
        let result = sqlx::query("UPDATE workout_sessions SET logs = logs || $2 WHERE session_id = $1")
            .bind(session_id)
            .bind(Json(entry))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn finish_session(
        &self,
        session_id: Uuid,
        finished_at: DateTime<Utc>,
    ) -> Result<Option<WorkoutSession>, StoreError> {
        let row = sqlx::query_as::<_, SessionRow>(
            "UPDATE workout_sessions SET finished_at = $2 WHERE session_id = $1 RETURNING *",
        )
        .bind(session_id)
        .bind(finished_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(WorkoutSession::from))
    }

    async fn latest_program_session(
        &self,
        uid: &str,
    ) -> Result<Option<WorkoutSession>, StoreError> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT * FROM workout_sessions \
             WHERE uid = $1 AND origin->>'kind' = 'program' \
             ORDER BY finished_at DESC NULLS LAST, started_at DESC \
             LIMIT 1",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(WorkoutSession::from))
    }

    async fn increment_user_stats(&self, uid: &str, calories: f64) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE users SET calories_burned = calories_burned + $2, \
             workouts_done = workouts_done + 1, updated_at = $3 WHERE uid = $1",
        )
        .bind(uid)
        .bind(calories)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError(format!("no user document for uid {}", uid)));
        }
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT INTO users \
             (uid, calories_burned, workouts_done, weekly_goal, workout_plan_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (uid) DO NOTHING",
        )
        .bind(&user.uid)
        .bind(user.calories_burned)
        .bind(user.workouts_done)
        .bind(user.weekly_goal)
        .bind(&user.workout_plan_id)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_user(&self, uid: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE uid = $1")
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}
