use crate::error::{FilterError, Result};
use crate::tokenizer::split_labels;
use crate::types::{AddOneResult, BatchAddResult, EngineConfig, ListResult, Page};
use anime_filters_store::{LabelStore, StoreError};
use std::sync::Arc;

/// Business rules on top of a [`LabelStore`].
///
/// Reads that fail at the storage layer are logged and answered as if the scope
/// were empty (no labels, count 0, active). Writes that fail surface as
/// [`FilterError::StorageUnavailable`].
#[derive(Clone)]
pub struct FilterEngine {
    store: Arc<dyn LabelStore>,
    config: EngineConfig,
}

impl FilterEngine {
    pub fn new(store: Arc<dyn LabelStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn LabelStore> {
        &self.store
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.config.page_size
    }

    pub async fn add_one(&self, scope: &str, raw: &str) -> Result<AddOneResult> {
        let label = raw.trim();
        if label.is_empty() {
            return Err(FilterError::EmptyInput);
        }

        let outcome = self.store.add_label(scope, label).await?;
        let current_total = self.count(scope).await;
        log::info!(
            "add_one scope={scope} added={} total={current_total}",
            outcome.is_added()
        );

        Ok(AddOneResult {
            label: label.to_string(),
            added: outcome.is_added(),
            current_total,
        })
    }

    /// Comma-separated add. A failing write aborts the batch; labels stored
    /// before the failure stay stored.
    pub async fn add_batch(&self, scope: &str, raw: &str) -> Result<BatchAddResult> {
        let labels = split_labels(raw);
        if labels.is_empty() {
            return Err(FilterError::EmptyInput);
        }

        let mut result = BatchAddResult::default();
        for label in labels {
            if self.store.add_label(scope, &label).await?.is_added() {
                result.added_count += 1;
                result.added.push(label);
            } else {
                result.duplicates.push(label);
            }
        }
        result.current_total = self.count(scope).await;
        log::info!(
            "add_batch scope={scope} added={} duplicates={} total={}",
            result.added_count,
            result.duplicates.len(),
            result.current_total
        );

        Ok(result)
    }

    pub async fn list(&self, scope: &str) -> Result<ListResult> {
        let labels = self
            .store
            .labels(scope)
            .await
            .unwrap_or_else(|err| degraded("labels", scope, err, Vec::new()));
        if labels.is_empty() {
            return Err(FilterError::Empty);
        }
        if !self.is_active(scope).await {
            return Err(FilterError::Inactive);
        }

        Ok(ListResult {
            count: labels.len(),
            labels,
        })
    }

    /// Page of the scope's list using the configured page size.
    pub async fn list_page(&self, scope: &str, page_index: i64) -> Result<Page> {
        self.list_page_sized(scope, page_index, self.config.page_size)
            .await
    }

    /// Negative indexes clamp to the first page and a zero size to one item.
    /// Pages past the end come back empty with `total_pages` intact.
    ///
    /// Like [`list`](Self::list), emptiness wins over the active flag: an empty
    /// scope is page 1 of 1 even when stopped.
    pub async fn list_page_sized(
        &self,
        scope: &str,
        page_index: i64,
        page_size: usize,
    ) -> Result<Page> {
        let page_index = if page_index < 0 {
            0
        } else {
            usize::try_from(page_index).unwrap_or(usize::MAX)
        };
        let page_size = page_size.max(1);

        let page = self
            .store
            .labels_page(scope, page_index, page_size)
            .await
            .unwrap_or_else(|err| degraded("labels_page", scope, err, Default::default()));
        if page.total > 0 && !self.is_active(scope).await {
            return Err(FilterError::Inactive);
        }

        Ok(Page {
            items: page.items,
            page_index,
            page_size,
            total_pages: Page::total_pages_for(page.total, page_size),
            total_count: page.total,
        })
    }

    /// Case-sensitive substring search. No matches is `Ok(vec![])`.
    pub async fn search(&self, scope: &str, query: &str) -> Result<Vec<String>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FilterError::EmptyQuery);
        }

        let matches = self
            .store
            .search_labels(scope, query)
            .await
            .unwrap_or_else(|err| degraded("search_labels", scope, err, Vec::new()));
        log::debug!("search scope={scope} query={query:?} matches={}", matches.len());
        Ok(matches)
    }

    pub async fn set_active(&self, scope: &str, active: bool) -> Result<()> {
        self.store.set_active(scope, active).await?;
        log::info!("set_active scope={scope} active={active}");
        Ok(())
    }

    pub async fn count(&self, scope: &str) -> usize {
        self.store
            .count(scope)
            .await
            .unwrap_or_else(|err| degraded("count", scope, err, 0))
    }

    pub async fn is_active(&self, scope: &str) -> bool {
        self.store
            .is_active(scope)
            .await
            .unwrap_or_else(|err| degraded("is_active", scope, err, true))
    }
}

fn degraded<T>(operation: &str, scope: &str, err: StoreError, fallback: T) -> T {
    log::warn!("{operation} failed for scope {scope}, treating it as empty: {err}");
    fallback
}
