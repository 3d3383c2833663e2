//! Persistence for the visited set.
//!
//! A single JSON document holds every delivered comic id:
//!
//! ```text
//! {"visited": [1, 57, 404, ...]}
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::VisitedSet;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for visited-set storage backends.
#[async_trait]
pub trait VisitedStore: Send + Sync {
    /// Load the set, or an empty one if nothing was saved yet.
    async fn load(&self) -> Result<VisitedSet>;

    /// Replace the stored set with `visited`.
    async fn save(&self, visited: &VisitedSet) -> Result<()>;
}
