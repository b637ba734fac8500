use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewRoom, Room};

pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Room>, sqlx::Error> {
    sqlx::query_as::<_, Room>(
        "SELECT * FROM rooms WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn create(pool: &PgPool, room: &NewRoom) -> Result<Room, sqlx::Error> {
    sqlx::query_as::<_, Room>(
        "INSERT INTO rooms (user_id, project_id, name, icon, visualizations)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(room.user_id)
    .bind(room.project_id)
    .bind(&room.name)
    .bind(&room.icon)
    .bind(&room.visualizations)
    .fetch_one(pool)
    .await
}
