//! API trait definitions split by responsibility
//!
//! This module organizes the Pulp API surface into focused sub-traits:
//! - [`AuthApi`] - Token issuance
//! - [`ArtifactApi`] - Artifact upload and removal
//! - [`ContentApi`] - File content unit CRUD
//! - [`RemoteApi`] - Remotes and sync
//! - [`RepositoryApi`] - Repositories and version content
//!
//! The [`PulpApi`] super-trait combines all of them.

mod artifact;
mod auth;
mod content;
mod remote;
mod repository;

pub use artifact::ArtifactApi;
pub use auth::AuthApi;
pub use content::ContentApi;
pub use remote::RemoteApi;
pub use repository::RepositoryApi;

/// Everything the scenarios need from a Pulp server
pub trait PulpApi: AuthApi + ArtifactApi + ContentApi + RemoteApi + RepositoryApi {}

impl<T> PulpApi for T where T: AuthApi + ArtifactApi + ContentApi + RemoteApi + RepositoryApi {}
