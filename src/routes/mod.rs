pub mod auth;
pub mod images;
pub mod projects;
pub mod rooms;
pub mod users;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/user", post(users::get_by_email))
        // Images
        .route("/api/images/proxy", get(images::proxy))
        // Projects
        .route("/api/projects", get(projects::list).post(projects::create))
        // Rooms
        .route("/api/rooms", get(rooms::list).post(rooms::create))
}
