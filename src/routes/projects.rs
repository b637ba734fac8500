use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{NewProject, Project};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub status: Option<String>,
}

pub async fn list(State(state): State<SharedState>) -> Result<Json<Vec<Project>>, AppError> {
    let projects = state.store.list_projects().await?;
    Ok(Json(projects))
}

pub async fn create(
    State(state): State<SharedState>,
    payload: Result<Json<CreateProject>, JsonRejection>,
) -> Result<Json<Project>, AppError> {
    let Json(req) = payload?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Nazwa projektu jest wymagana".to_string()));
    }

    let budget = req.budget.unwrap_or(0.0);
    validate_budget(budget)?;

    let project = state
        .store
        .insert_project(NewProject {
            name: name.to_string(),
            description: req.description.filter(|d| !d.trim().is_empty()),
            budget,
            status: req.status,
        })
        .await?;

    tracing::info!(project_id = %project.id, "Project created");

    Ok(Json(project))
}

fn validate_budget(budget: f64) -> Result<(), AppError> {
    if !budget.is_finite() || budget < 0.0 {
        return Err(AppError::BadRequest(
            "Budżet musi być nieujemną liczbą".to_string(),
        ));
    }
    Ok(())
}
