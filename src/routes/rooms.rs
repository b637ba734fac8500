use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::StoreError;
use crate::error::AppError;
use crate::models::{NewRoom, Room};
use crate::state::SharedState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRoomsQuery {
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoom {
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub name: String,
    pub icon: String,
    #[serde(default)]
    pub visualizations: Vec<String>,
}

pub async fn list(
    State(state): State<SharedState>,
    query: Result<Query<ListRoomsQuery>, QueryRejection>,
) -> Result<Json<Vec<Room>>, AppError> {
    let Query(query) = query?;

    let user_id = query
        .user_id
        .as_deref()
        .and_then(|id| Uuid::parse_str(id.trim()).ok())
        .ok_or_else(|| {
            AppError::BadRequest("Parametr userId jest wymagany i musi być UUID".to_string())
        })?;

    let rooms = state.store.list_rooms(user_id).await?;
    Ok(Json(rooms))
}

pub async fn create(
    State(state): State<SharedState>,
    payload: Result<Json<CreateRoom>, JsonRejection>,
) -> Result<Json<Room>, AppError> {
    let Json(req) = payload?;

    if req.name.trim().is_empty() || req.icon.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Nazwa i ikona pomieszczenia są wymagane".to_string(),
        ));
    }

    let visualizations = req
        .visualizations
        .into_iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect();

    let room = state
        .store
        .insert_room(NewRoom {
            user_id: req.user_id,
            project_id: req.project_id,
            name: req.name.trim().to_string(),
            icon: req.icon,
            visualizations,
        })
        .await
        .map_err(|e| match e {
            StoreError::MissingReference => AppError::BadRequest(
                "Wskazany użytkownik lub projekt nie istnieje".to_string(),
            ),
            other => AppError::Store(other),
        })?;

    tracing::info!(room_id = %room.id, user_id = %room.user_id, "Room created");

    Ok(Json(room))
}
