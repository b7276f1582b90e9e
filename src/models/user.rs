use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Aggregate fitness counters for one user. `calories_burned` and
/// `workouts_done` are incremented by session finish; both increments are
/// atomic add-to-current-value operations at the store level.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    pub calories_burned: f64,
    pub workouts_done: i64,
    pub weekly_goal: i64,
    pub workout_plan_id: Option<String>,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}
