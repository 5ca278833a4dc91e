//! # Anime Filters Store
//!
//! Persistence for per-chat (or global) anime filter lists.
//!
//! ## Backends
//!
//! ```text
//! LabelStore (async trait)
//!     │
//!     ├──> JsonFileStore
//!     │      └─> { "<chat>": { "anime_list": [...], "filters_active": bool } }
//!     │
//!     └──> SqliteStore
//!            └─> labels(scope, label UNIQUE) + scopes(scope, active)
//! ```
//!
//! Both backends honor the same [`Partition`] (per-chat vs. one shared list) and
//! [`LabelOrder`] (insertion vs. lexicographic) settings.
//!
//! ## Example
//!
//! ```no_run
//! use anime_filters_store::{open_store, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = open_store(&StoreConfig::default()).await?;
//!     store.add_label("-100123", "Jujutsu Kaisen").await?;
//!
//!     for label in store.labels("-100123").await? {
//!         println!("• {label}");
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod file_lock;
mod json_store;
mod paths;
mod sqlite_store;
mod store;
mod types;

pub use config::{
    Backend, LabelOrder, Partition, StoreConfig, DEFAULT_JSON_PATH, DEFAULT_SQLITE_PATH,
    GLOBAL_SCOPE,
};
pub use error::{Result, StoreError};
pub use file_lock::{store_write_lock_wait_ms_last, store_write_lock_wait_ms_max};
pub use json_store::JsonFileStore;
pub use paths::corrupt_backup_path;
pub use sqlite_store::SqliteStore;
pub use store::{open_store, LabelStore};
pub use types::{page_range, AddOutcome, LabelPage, StoreDescriptor, StoreStats};
