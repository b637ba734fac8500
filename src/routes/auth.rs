use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::password;
use crate::db::StoreError;
use crate::error::AppError;
use crate::models::{NewUser, User};
use crate::state::SharedState;

/// Shared by the unknown-email and wrong-password paths so the response does
/// not reveal whether an account exists.
pub const INVALID_CREDENTIALS: &str = "Nieprawidłowy email lub hasło";
pub const EXTERNAL_ACCOUNT: &str =
    "To konto korzysta z logowania zewnętrznego. Zaloguj się przez dostawcę tożsamości.";

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: User,
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

pub async fn register(
    State(state): State<SharedState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(req) = payload?;

    if [&req.email, &req.password, &req.first_name, &req.last_name]
        .iter()
        .any(|f| is_blank(f))
    {
        return Err(AppError::BadRequest("Wszystkie pola są wymagane".to_string()));
    }

    if req.password.len() > password::MAX_PASSWORD_BYTES {
        return Err(AppError::BadRequest(format!(
            "Hasło może mieć najwyżej {} bajty",
            password::MAX_PASSWORD_BYTES
        )));
    }

    let pw_hash = password::hash(req.password, state.config.password_cost)
        .await
        .map_err(AppError::Internal)?;

    // The unique index on users.email decides duplicates; there is no
    // separate existence check to race against.
    let user = state
        .store
        .insert_user(NewUser {
            email: req.email,
            password_hash: Some(pw_hash),
            first_name: req.first_name,
            last_name: req.last_name,
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict => {
                AppError::Conflict("Użytkownik z tym adresem email już istnieje".to_string())
            }
            other => AppError::Store(other),
        })?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(AuthResponse {
        message: "Konto zostało utworzone".to_string(),
        user,
    }))
}

pub async fn login(
    State(state): State<SharedState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(req) = payload?;

    if is_blank(&req.email) || is_blank(&req.password) {
        return Err(AppError::BadRequest("Email i hasło są wymagane".to_string()));
    }

    if let Err(retry_after) = state.login_limiter.try_attempt(&req.email) {
        return Err(AppError::RateLimited(format!(
            "Zbyt wiele nieudanych prób logowania. Spróbuj ponownie za {} min.",
            retry_after.div_ceil(60).max(1)
        )));
    }

    let Some(user) = state.store.find_user_by_email(&req.email).await? else {
        // Pay the same bcrypt cost as a wrong password.
        let dummy = state
            .timing_dummy_hash()
            .await
            .map_err(AppError::Internal)?
            .to_string();
        let _ = password::verify(req.password, dummy).await;
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if password::is_external_account(user.password_hash.as_deref()) {
        return Err(AppError::Unauthorized(EXTERNAL_ACCOUNT.to_string()));
    }
    let stored = user.password_hash.clone().unwrap_or_default();

    let valid = password::verify(req.password, stored)
        .await
        .map_err(AppError::Internal)?;

    if !valid {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    state.login_limiter.reset(&req.email);
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        message: "Zalogowano pomyślnie".to_string(),
        user,
    }))
}
