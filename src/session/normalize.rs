//! Lenient coercion of caller-supplied documents.
//!
//! Session payloads come from clients that serialize loosely: snapshots may
//! arrive as JSON-encoded strings, numeric fields as strings, and fields may
//! be missing entirely. Every function here is total: malformed input falls
//! back to a neutral value (`0`, `""`, `{}`, `[]`) instead of erroring.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::session::{LogEntry, LogTarget, Performed, SessionSnapshot};

/// Coerce a JSON value to an integer. Numbers are truncated, numeric
/// strings parsed; everything else is 0.
pub fn coerce_i64(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .unwrap_or_else(|| n.as_f64().unwrap_or(0.0) as i64),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .or_else(|_| s.trim().parse::<f64>().map(|f| f as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

/// Coerce a JSON value to a float. Numeric strings are parsed; everything
/// else is 0.0.
pub fn coerce_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Coerce a JSON value to a string. Numbers render decimally; everything
/// else is the empty string.
pub fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

// A snapshot (or its `exercises` field) may itself arrive JSON-encoded as a
// string. Parse failures substitute the given fallback.
fn parse_if_string(value: Value, fallback: Value) -> Value {
    match value {
        Value::String(s) => serde_json::from_str(&s).unwrap_or(fallback),
        other => other,
    }
}

/// Normalize a raw snapshot document. Accepts an object, a JSON-encoded
/// string, or nothing at all; the result always has a string `programName`
/// and an `exercises` array.
pub fn snapshot(raw: Option<Value>) -> SessionSnapshot {
    let raw = match raw {
        Some(v) => parse_if_string(v, Value::Object(serde_json::Map::new())),
        None => return SessionSnapshot::default(),
    };

    let program_name = coerce_string(raw.get("programName"));
    let exercises = match raw
        .get("exercises")
        .cloned()
        .map(|v| parse_if_string(v, Value::Array(Vec::new())))
    {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };

    SessionSnapshot {
        program_name,
        exercises,
    }
}

/// Resolve the expected exercise count: an explicit numeric value wins,
/// otherwise the snapshot length (which bottoms out at 0).
pub fn total_exercises(explicit: Option<&Value>, snapshot: &SessionSnapshot) -> i64 {
    match explicit {
        Some(Value::Number(n)) => n
            .as_i64()
            .unwrap_or_else(|| n.as_f64().unwrap_or(0.0) as i64),
        _ => snapshot.exercises.len() as i64,
    }
}

/// Build a typed log entry from a raw caller document, coercing every
/// field. `at` is server-assigned at append time.
pub fn log_entry(raw: &Value, at: DateTime<Utc>) -> LogEntry {
    let target = raw.get("target");
    let performed = raw.get("performed");

    LogEntry {
        order: coerce_i64(raw.get("order")),
        exercise_id: coerce_string(raw.get("exerciseId")),
        name: coerce_string(raw.get("name")),
        target: LogTarget {
            kind: coerce_string(target.and_then(|t| t.get("type"))),
            value: coerce_string(target.and_then(|t| t.get("value"))),
        },
        performed: Performed {
            seconds: coerce_i64(performed.and_then(|p| p.get("seconds"))),
            reps: coerce_i64(performed.and_then(|p| p.get("reps"))),
        },
        calories: coerce_f64(raw.get("calories")),
        at,
    }
}
