use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Where a session's exercise list came from: a saved program or an
/// ad-hoc daily routine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SessionOrigin {
    #[serde(rename_all = "camelCase")]
    Program { program_id: String },
    Daily,
}

/// Immutable copy of the exercise list taken at session start. Exercise
/// descriptors are kept as raw JSON documents; the lifecycle only needs
/// their count and echoes the rest back verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSnapshot {
    pub program_name: String,
    pub exercises: Vec<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LogTarget {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Performed {
    pub seconds: i64,
    pub reps: i64,
}

/// One record of a single exercise's performed result within a session.
/// Append-only; `order` is caller-assigned and never validated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub order: i64,
    pub exercise_id: String,
    pub name: String,
    pub target: LogTarget,
    pub performed: Performed,
    pub calories: f64,
    pub at: DateTime<Utc>,
}

/// Aggregated seconds/reps/calories across a session's log entries.
/// Always recomputed from `logs`, never stored.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Totals {
    pub seconds: i64,
    pub reps: i64,
    pub calories: f64,
}

/// One tracked execution of a workout. Active while `finished_at` is
/// unset; there is no cancel state.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub session_id: Uuid,
    pub uid: String,
    pub origin: SessionOrigin,
    pub snapshot: SessionSnapshot,
    pub total_exercises: Option<i64>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub logs: Vec<LogEntry>,
}

impl WorkoutSession {
    /// Expected exercise count: the stored value when present, otherwise
    /// the snapshot length.
    pub fn expected_exercises(&self) -> i64 {
        self.total_exercises
            .unwrap_or(self.snapshot.exercises.len() as i64)
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub program_name: String,
    pub total_exercises: i64,
    pub done_exercises: i64,
    pub totals: Totals,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProgramSessionSummary {
    #[serde(flatten)]
    pub summary: SessionSummary,
    pub started_at: DateTime<Utc>,
    pub logs: Vec<LogEntry>,
}
