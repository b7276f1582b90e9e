use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::session::lifecycle;
use crate::store::SessionStore;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    #[validate(required(message = "uid is required"))]
    #[validate(length(min = 1, message = "uid cannot be empty"))]
    uid: Option<String>,

    // Validated by the lifecycle: kind must be "program" or "daily".
    origin: Option<Value>,

    // May arrive as an object or a JSON-encoded string; normalized
    // leniently downstream.
    snapshot: Option<Value>,

    total_exercises: Option<Value>,
}

// POST /sessions/start
pub async fn start_session<S: SessionStore + 'static>(
    store: web::Data<S>,
    payload: web::Json<StartSessionRequest>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*payload)?;
    let payload = payload.into_inner();

    let session = lifecycle::start(
        store.get_ref(),
        payload.uid.as_deref().unwrap_or_default(),
        payload.origin,
        payload.snapshot,
        payload.total_exercises,
    )
    .await?;

    Ok(HttpResponse::Created().json(session))
}

// POST /sessions/:sessionId/log-exercise
pub async fn log_exercise<S: SessionStore + 'static>(
    store: web::Data<S>,
    session_id: web::Path<Uuid>,
    entry: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    lifecycle::log_exercise(store.get_ref(), *session_id, &entry).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}

// PATCH /sessions/:sessionId/finish
pub async fn finish_session<S: SessionStore + 'static>(
    store: web::Data<S>,
    session_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let summary = lifecycle::finish(store.get_ref(), *session_id).await?;
    Ok(HttpResponse::Ok().json(summary))
}

// GET /summary/program/:uid
pub async fn latest_program_summary<S: SessionStore + 'static>(
    store: web::Data<S>,
    uid: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let summary = lifecycle::summarize_latest_program(store.get_ref(), &uid).await?;
    Ok(HttpResponse::Ok().json(summary))
}
