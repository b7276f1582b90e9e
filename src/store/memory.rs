//! In-memory store double for tests. Mirrors the Postgres semantics the
//! lifecycle relies on: append returns whether the session existed, finish
//! overwrites unconditionally, and the program-session query sorts
//! finished_at descending with nulls last.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::models::session::{LogEntry, SessionOrigin, WorkoutSession};
use crate::models::user::User;
use crate::store::{SessionStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<Uuid, WorkoutSession>>,
    users: Mutex<HashMap<String, User>>,
    fail_user_updates: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Make `increment_user_stats` fail, simulating a store outage during
    /// the finish-time side effect.
    pub fn fail_user_updates(&self) {
        self.fail_user_updates.store(true, AtomicOrdering::SeqCst);
    }

    pub fn session(&self, session_id: Uuid) -> Option<WorkoutSession> {
        self.sessions.lock().unwrap().get(&session_id).cloned()
    }

    pub fn seed_session(&self, session: WorkoutSession) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.session_id, session);
    }

    pub fn seed_user(&self, uid: &str) {
        let now = Utc::now();
        self.users.lock().unwrap().insert(
            uid.to_string(),
            User {
                uid: uid.to_string(),
                calories_burned: 0.0,
                workouts_done: 0,
                weekly_goal: 0,
                workout_plan_id: None,
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn user(&self, uid: &str) -> Option<User> {
        self.users.lock().unwrap().get(uid).cloned()
    }
}

// finished_at descending with unfinished sessions last, then started_at
// descending.
fn latest_first(a: &WorkoutSession, b: &WorkoutSession) -> Ordering {
    match (a.finished_at, b.finished_at) {
        (Some(af), Some(bf)) => bf.cmp(&af),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| b.started_at.cmp(&a.started_at))
}

impl SessionStore for MemoryStore {
    async fn insert_session(&self, session: &WorkoutSession) -> Result<(), StoreError> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn append_log(&self, session_id: Uuid, entry: &LogEntry) -> Result<bool, StoreError> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get_mut(&session_id) {
            Some(session) => {
                session.logs.push(entry.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn finish_session(
        &self,
        session_id: Uuid,
        finished_at: DateTime<Utc>,
    ) -> Result<Option<WorkoutSession>, StoreError> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get_mut(&session_id) {
            Some(session) => {
                session.finished_at = Some(finished_at);
                Ok(Some(session.clone()))
            }
            None => Ok(None),
        }
    }

    async fn latest_program_session(
        &self,
        uid: &str,
    ) -> Result<Option<WorkoutSession>, StoreError> {
        let sessions = self.sessions.lock().unwrap();
        let mut candidates: Vec<&WorkoutSession> = sessions
            .values()
            .filter(|s| s.uid == uid && matches!(s.origin, SessionOrigin::Program { .. }))
            .collect();
        candidates.sort_by(|a, b| latest_first(a, b));
        Ok(candidates.first().map(|s| (*s).clone()))
    }

    async fn increment_user_stats(&self, uid: &str, calories: f64) -> Result<(), StoreError> {
        if self.fail_user_updates.load(AtomicOrdering::SeqCst) {
            return Err(StoreError("simulated user-stat failure".to_string()));
        }
        let mut users = self.users.lock().unwrap();
        match users.get_mut(uid) {
            Some(user) => {
                user.calories_burned += calories;
                user.workouts_done += 1;
                user.updated_at = Utc::now();
                Ok(())
            }
            None => Err(StoreError(format!("no user document for uid {}", uid))),
        }
    }

    async fn insert_user(&self, user: &User) -> Result<bool, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.uid) {
            return Ok(false);
        }
        users.insert(user.uid.clone(), user.clone());
        Ok(true)
    }

    async fn find_user(&self, uid: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().unwrap().get(uid).cloned())
    }
}
