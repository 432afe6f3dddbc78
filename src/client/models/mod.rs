//! Pulp API data models
//!
//! Domain types sent to and returned by the Pulp 3 REST API, organized by
//! resource type. Server-generated fields the scenarios do not inspect are
//! kept in a flattened `extra` map so that full records can be compared.

mod artifact;
mod auth;
mod content;
mod page;
mod remote;
mod repository;
mod task;

// Re-export all models for convenient access
pub use artifact::Artifact;
pub use auth::JwtToken;
pub use content::{FileContent, NewFileContent};
pub use page::Page;
pub use remote::{FileRemote, NewRemote};
pub use repository::{NewRepository, Repository};
pub use task::{SpawnedTasks, Task, TaskState};
