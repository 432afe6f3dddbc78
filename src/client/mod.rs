//! Pulp API client

pub mod api;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod paths;
pub mod pulp;

pub use api::PulpApi;
#[cfg(test)]
pub use mock::MockPulpClient;
pub use pulp::PulpClient;
