// Cache module for working-directory caching.
// Keeps fetched release pointers and details so re-runs skip the network.

pub mod paths;
pub mod store;

pub use paths::Namespace;
pub use store::{Cache, NamespaceState, NamespaceStatus};
