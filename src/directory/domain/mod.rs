//! Directory value types.

mod error;
mod ids;
mod project;
mod user;

pub use error::ParseRoleError;
pub use ids::{ProjectId, UserId};
pub use project::Project;
pub use user::{Role, User};
