use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{NewProject, NewRoom, NewUser, Project, Room, User};

/// In-process store with the same constraint behaviour as the SQL schema:
/// unique emails, and rooms that must point at existing users and projects.
#[derive(Default)]
pub struct MemoryStore {
    /// email -> user
    users: DashMap<String, User>,
    projects: DashMap<Uuid, Project>,
    rooms: DashMap<Uuid, Room>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user row as-is, bypassing registration. Used to seed
    /// externally-authenticated accounts.
    pub fn seed_user(&self, user: User) {
        self.users.insert(user.email.clone(), user);
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    fn user_exists(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict),
            Entry::Vacant(slot) => {
                let row = User {
                    id: Uuid::now_v7(),
                    email: user.email,
                    password_hash: user.password_hash,
                    first_name: user.first_name,
                    last_name: user.last_name,
                    created_at: Utc::now(),
                };
                slot.insert(row.clone());
                Ok(row)
            }
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(email).map(|u| u.value().clone()))
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let mut projects: Vec<Project> = self.projects.iter().map(|p| p.value().clone()).collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn insert_project(&self, project: NewProject) -> Result<Project, StoreError> {
        let row = Project {
            id: Uuid::now_v7(),
            name: project.name,
            description: project.description,
            budget: project.budget,
            status: project.status,
            created_at: Utc::now(),
        };
        self.projects.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_rooms(&self, user_id: Uuid) -> Result<Vec<Room>, StoreError> {
        let mut rooms: Vec<Room> = self
            .rooms
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.value().clone())
            .collect();
        rooms.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rooms)
    }

    async fn insert_room(&self, room: NewRoom) -> Result<Room, StoreError> {
        if !self.user_exists(room.user_id) {
            return Err(StoreError::MissingReference);
        }
        if let Some(project_id) = room.project_id {
            if !self.projects.contains_key(&project_id) {
                return Err(StoreError::MissingReference);
            }
        }

        let now = Utc::now();
        let row = Room {
            id: Uuid::now_v7(),
            user_id: room.user_id,
            project_id: room.project_id,
            name: room.name,
            icon: room.icon,
            visualizations: room.visualizations,
            expenses_total: 0.0,
            created_at: now,
            updated_at: now,
        };
        self.rooms.insert(row.id, row.clone());
        Ok(row)
    }
}
