use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use crate::errors::AppError;
use crate::models::user::User;
use crate::store::SessionStore;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(required(message = "uid is required"))]
    #[validate(length(min = 1, message = "uid cannot be empty"))]
    uid: Option<String>,

    weekly_goal: Option<i64>,
    workout_plan_id: Option<String>,
}

// POST /users
pub async fn create_user<S: SessionStore + 'static>(
    store: web::Data<S>,
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*payload)?;
    let payload = payload.into_inner();

    let now = Utc::now();
    let user = User {
        uid: payload.uid.unwrap_or_default(),
        calories_burned: 0.0,
        workouts_done: 0,
        weekly_goal: payload.weekly_goal.unwrap_or(0),
        workout_plan_id: payload.workout_plan_id,
        created_at: now,
        updated_at: now,
    };

    let inserted = store
        .insert_user(&user)
        .await
        .map_err(|_| AppError::InternalServerError("Database error".to_string()))?;
    if !inserted {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    Ok(HttpResponse::Created().json(user))
}

// GET /users/:uid/stats
pub async fn get_user_stats<S: SessionStore + 'static>(
    store: web::Data<S>,
    uid: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user = store
        .find_user(&uid)
        .await
        .map_err(|_| AppError::InternalServerError("Database error".to_string()))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(user))
}
