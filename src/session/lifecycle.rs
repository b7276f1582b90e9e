//! Session lifecycle: start → log-exercise → finish, plus the latest
//! program-session summary. Two states only: a session is Active while
//! `finished_at` is unset and Finished afterwards; there is no cancel
//! transition. The lifecycle holds no state of its own — everything lives
//! behind the passed-in store.

use chrono::Utc;
use log::warn;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::session::{
    ProgramSessionSummary, SessionOrigin, SessionSummary, WorkoutSession,
};
use crate::session::aggregate::aggregate;
use crate::session::normalize;
use crate::store::SessionStore;

fn parse_origin(origin: Option<&Value>) -> Result<SessionOrigin, AppError> {
    let kind = origin.and_then(|o| o.get("kind")).and_then(Value::as_str);
    match kind {
        Some("program") => Ok(SessionOrigin::Program {
            program_id: normalize::coerce_string(origin.and_then(|o| o.get("programId"))),
        }),
        Some("daily") => Ok(SessionOrigin::Daily),
        Some(other) => Err(AppError::BadRequest(format!(
            "origin.kind must be program or daily, got {}",
            other
        ))),
        None => Err(AppError::BadRequest("origin.kind is required".to_string())),
    }
}

/// Create a new Active session. The snapshot is normalized leniently
/// (string-encoded documents are parsed, malformed ones fall back to
/// empty); nothing is persisted when the insert fails.
pub async fn start<S: SessionStore>(
    store: &S,
    uid: &str,
    origin: Option<Value>,
    snapshot: Option<Value>,
    total_exercises: Option<Value>,
) -> Result<WorkoutSession, AppError> {
    if uid.trim().is_empty() {
        return Err(AppError::BadRequest("uid is required".to_string()));
    }
    let origin = parse_origin(origin.as_ref())?;
    let snapshot = normalize::snapshot(snapshot);
    let total_exercises = normalize::total_exercises(total_exercises.as_ref(), &snapshot);

    let session = WorkoutSession {
        session_id: Uuid::new_v4(),
        uid: uid.to_string(),
        origin,
        snapshot,
        total_exercises: Some(total_exercises),
        started_at: Utc::now(),
        finished_at: None,
        logs: Vec::new(),
    };

    store
        .insert_session(&session)
        .await
        .map_err(|_| AppError::InternalServerError("Database error".to_string()))?;

    Ok(session)
}

/// Append one coerced log entry to an existing session. Entries are kept
/// in arrival order, duplicates included; a finished session still accepts
/// logs (the source system never guarded this).
pub async fn log_exercise<S: SessionStore>(
    store: &S,
    session_id: Uuid,
    raw_entry: &Value,
) -> Result<(), AppError> {
    let entry = normalize::log_entry(raw_entry, Utc::now());

    let found = store
        .append_log(session_id, &entry)
        .await
        .map_err(|_| AppError::InternalServerError("Database error".to_string()))?;
    if !found {
        return Err(AppError::NotFound("Session not found".to_string()));
    }
    Ok(())
}

/// Mark a session finished and roll its totals up into the owner's
/// counters. Not idempotent: a repeat call overwrites `finished_at` with
/// the later timestamp. The user-stat increment is best-effort; its
/// failure is logged and never reaches the caller.
pub async fn finish<S: SessionStore>(
    store: &S,
    session_id: Uuid,
) -> Result<SessionSummary, AppError> {
    let finished_at = Utc::now();
    let session = store
        .finish_session(session_id, finished_at)
        .await
        .map_err(|_| AppError::InternalServerError("Database error".to_string()))?
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    let totals = aggregate(&session.logs);

    if let Err(err) = store.increment_user_stats(&session.uid, totals.calories).await {
        warn!(
            "failed to update stats for user {} after session {}: {}",
            session.uid, session_id, err
        );
    }

    Ok(SessionSummary {
        session_id,
        program_name: session.snapshot.program_name.clone(),
        total_exercises: session.expected_exercises(),
        done_exercises: session.logs.len() as i64,
        totals,
        finished_at: Some(finished_at),
    })
}

/// Summary of the user's most recent program-origin session, finished or
/// not, under `(finished_at desc nulls last, started_at desc)`.
pub async fn summarize_latest_program<S: SessionStore>(
    store: &S,
    uid: &str,
) -> Result<ProgramSessionSummary, AppError> {
    if uid.trim().is_empty() {
        return Err(AppError::BadRequest("uid is required".to_string()));
    }
    let session = store
        .latest_program_session(uid)
        .await
        .map_err(|_| AppError::InternalServerError("Database error".to_string()))?
        .ok_or_else(|| AppError::NotFound("No program session found".to_string()))?;

    let totals = aggregate(&session.logs);

    Ok(ProgramSessionSummary {
        summary: SessionSummary {
            session_id: session.session_id,
            program_name: session.snapshot.program_name.clone(),
            total_exercises: session.expected_exercises(),
            done_exercises: session.logs.len() as i64,
            totals,
            finished_at: session.finished_at,
        },
        started_at: session.started_at,
        logs: session.logs,
    })
}
