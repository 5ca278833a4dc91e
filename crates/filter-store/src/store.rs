use crate::config::{Backend, StoreConfig};
use crate::error::Result;
use crate::json_store::JsonFileStore;
use crate::sqlite_store::SqliteStore;
use crate::types::{AddOutcome, LabelPage, StoreDescriptor, StoreStats};
use async_trait::async_trait;
use std::sync::Arc;

/// Persistence contract shared by every backend.
///
/// `scope` is the raw chat identifier; backends apply their configured
/// [`Partition`](crate::Partition) to it. All listing methods honor the
/// configured [`LabelOrder`](crate::LabelOrder).
#[async_trait]
pub trait LabelStore: Send + Sync {
    /// Inserts `label` unless an identical one is already stored in the scope.
    /// The existence check and the insert are a single atomic step.
    async fn add_label(&self, scope: &str, label: &str) -> Result<AddOutcome>;

    async fn labels(&self, scope: &str) -> Result<Vec<String>>;

    /// Zero-based page of the ordered list; pages past the end are empty.
    async fn labels_page(&self, scope: &str, page_index: usize, page_size: usize)
        -> Result<LabelPage>;

    /// Case-sensitive substring match. An empty needle matches everything.
    async fn search_labels(&self, scope: &str, needle: &str) -> Result<Vec<String>>;

    /// `true` for scopes that were never deactivated.
    async fn is_active(&self, scope: &str) -> Result<bool>;

    async fn set_active(&self, scope: &str, active: bool) -> Result<()>;

    async fn count(&self, scope: &str) -> Result<usize>;

    async fn stats(&self) -> Result<StoreStats>;

    fn descriptor(&self) -> StoreDescriptor;
}

pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn LabelStore>> {
    let path = config.resolved_path();
    let store: Arc<dyn LabelStore> = match config.backend {
        Backend::Json => {
            Arc::new(JsonFileStore::open(path, config.partition, config.order).await?)
        }
        Backend::Sqlite => {
            Arc::new(SqliteStore::open(path, config.partition, config.order).await?)
        }
    };
    Ok(store)
}
