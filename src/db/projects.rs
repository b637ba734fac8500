use sqlx::PgPool;

use crate::models::{NewProject, Project};

pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn create(pool: &PgPool, project: &NewProject) -> Result<Project, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "INSERT INTO projects (name, description, budget, status)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&project.name)
    .bind(&project.description)
    .bind(project.budget)
    .bind(&project.status)
    .fetch_one(pool)
    .await
}
