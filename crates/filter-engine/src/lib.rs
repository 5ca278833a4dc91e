//! # Anime Filters Engine
//!
//! The rules behind `/filters`, `/list`, `/search`, `/stop` and `/restart`.
//!
//! ```text
//! raw command text
//!     │
//!     ├──> split_labels (comma tokenizer, trim, drop blanks)
//!     │
//!     ├──> FilterEngine
//!     │      ├─> add_one / add_batch   (dedup reporting)
//!     │      ├─> list / list_page      (Empty / Inactive gating, page math)
//!     │      ├─> search                (substring containment)
//!     │      └─> set_active / count
//!     │
//!     └──> LabelStore (anime-filters-store)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use anime_filters_engine::{EngineConfig, FilterEngine};
//! use anime_filters_store::{open_store, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = open_store(&StoreConfig::default()).await?;
//!     let engine = FilterEngine::new(store, EngineConfig::default());
//!
//!     let added = engine.add_batch("-100123", "Naruto, One Piece").await?;
//!     println!("added {} (total {})", added.added_count, added.current_total);
//!
//!     let page = engine.list_page("-100123", 0).await?;
//!     println!("page {}/{}", page.page_index + 1, page.total_pages);
//!     Ok(())
//! }
//! ```

mod engine;
mod error;
mod tokenizer;
mod types;

pub use engine::FilterEngine;
pub use error::{FilterError, Result};
pub use tokenizer::split_labels;
pub use types::{
    AddOneResult, BatchAddResult, EngineConfig, ListResult, Page, DEFAULT_PAGE_SIZE,
};
