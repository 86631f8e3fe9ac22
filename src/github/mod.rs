// GitHub API module.
// Provides the client and release types for the GitHub REST API.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::GitHubClient;
pub use types::*;
