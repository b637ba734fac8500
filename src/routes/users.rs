use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::User;
use crate::state::SharedState;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LookupRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// Exact-match lookup by email. Callers are trusted to have authorized the
/// request.
pub async fn get_by_email(
    State(state): State<SharedState>,
    payload: Result<Json<LookupRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let Json(req) = payload?;

    if req.email.trim().is_empty() {
        return Err(AppError::BadRequest("Email jest wymagany".to_string()));
    }

    let user = state
        .store
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::NotFound("Nie znaleziono użytkownika".to_string()))?;

    Ok(Json(UserResponse { user }))
}
