// GitHub API module.
// Provides the client and event types for the repository events endpoint.

pub mod client;
pub mod endpoints;
pub mod jsonp;
pub mod types;

pub use client::GitHubClient;
pub use types::*;
