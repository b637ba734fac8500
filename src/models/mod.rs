mod project;
mod room;
mod user;

pub use project::{NewProject, Project};
pub use room::{NewRoom, Room};
pub use user::{NewUser, User};
