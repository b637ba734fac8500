pub mod memory;
pub mod projects;
pub mod rooms;
pub mod users;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewProject, NewRoom, NewUser, Project, Room, User};

pub use memory::MemoryStore;

/// Failures a store reports, independent of the backend behind it.
#[derive(Debug)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    Conflict,
    /// A foreign key pointed at a row that does not exist.
    MissingReference,
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Conflict => write!(f, "unique constraint violated"),
            StoreError::MissingReference => write!(f, "referenced row does not exist"),
            StoreError::Backend(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                StoreError::MissingReference
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

/// Table-scoped operations the HTTP layer needs from persistence.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError>;
    async fn insert_project(&self, project: NewProject) -> Result<Project, StoreError>;
    async fn list_rooms(&self, user_id: Uuid) -> Result<Vec<Room>, StoreError>;
    async fn insert_room(&self, room: NewRoom) -> Result<Room, StoreError>;
}

/// PostgreSQL-backed store.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        Ok(users::create(&self.pool, &user).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(users::find_by_email(&self.pool, email).await?)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(projects::list(&self.pool).await?)
    }

    async fn insert_project(&self, project: NewProject) -> Result<Project, StoreError> {
        Ok(projects::create(&self.pool, &project).await?)
    }

    async fn list_rooms(&self, user_id: Uuid) -> Result<Vec<Room>, StoreError> {
        Ok(rooms::list_by_user(&self.pool, user_id).await?)
    }

    async fn insert_room(&self, room: NewRoom) -> Result<Room, StoreError> {
        Ok(rooms::create(&self.pool, &room).await?)
    }
}
