// Changelog puller library.
// Fetches the latest release notes of subscribed GitHub repositories, caches
// them in the working directory and renders them as text.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod github;
pub mod pull;
pub mod release;
pub mod render;
pub mod repository;

pub use error::{ChangelogError, Result};
pub use pull::{PullOutcome, run};
pub use render::Renderer;
