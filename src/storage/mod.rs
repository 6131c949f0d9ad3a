//! Storage abstractions for the processed-item history.
//!
//! The whole history is one JSON object mapping keys to records:
//!
//! ```text
//! {
//!   "https://.../Arquivos/CLASSIFICACAOFINAL_229.pdf": { "name": ..., "found_name": false, ... },
//!   "doe:9f1c...": { "source": "DOE-SP", "found_name": true, ... }
//! }
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::History;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for history storage backends.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Load the history. A store that was never written yields an empty one.
    async fn load(&self) -> Result<History>;

    /// Replace the stored history as a whole.
    async fn save(&self, history: &History) -> Result<()>;
}
