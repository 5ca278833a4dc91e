use crate::config::{Backend, LabelOrder, Partition};
use crate::error::{Result, StoreError};
use crate::file_lock::acquire_store_write_lock;
use crate::paths::{ensure_parent_dir, quarantine_corrupt_file, sibling_path, TEMP_SUFFIX};
use crate::store::LabelStore;
use crate::types::{page_range, AddOutcome, LabelPage, StoreDescriptor, StoreStats};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Per-chat record. Field names match the existing `anime_data.json` layout so
/// data from earlier deployments loads unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ScopeRecord {
    #[serde(rename = "anime_list", default)]
    labels: Vec<String>,
    #[serde(rename = "filters_active", default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

impl Default for ScopeRecord {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            active: true,
        }
    }
}

type Scopes = BTreeMap<String, ScopeRecord>;

/// Single JSON file mapping scope id to `{anime_list, filters_active}`.
///
/// Reads go to disk every time so processes sharing the file observe each other.
/// Writes are serialized by an in-process mutex plus an exclusive `fs2` lock on
/// `<file>.lock`, and land through a temp file + rename.
pub struct JsonFileStore {
    path: PathBuf,
    partition: Partition,
    order: LabelOrder,
    write_gate: Mutex<()>,
}

impl JsonFileStore {
    /// Opens (or creates) the store. A malformed file is moved aside to
    /// `<file>.corrupt` and replaced with an empty store.
    pub async fn open(
        path: impl AsRef<Path>,
        partition: Partition,
        order: LabelOrder,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent_dir(&path).await?;

        let store = Self {
            path,
            partition,
            order,
            write_gate: Mutex::new(()),
        };

        match read_scopes(&store.path).await {
            Ok(scopes) => {
                log::info!(
                    "Opened JSON store at {:?} ({} scopes, partition={partition}, order={order})",
                    store.path,
                    scopes.len()
                );
            }
            Err(StoreError::Corrupt { reason, .. }) => {
                let _gate = store.write_gate.lock().await;
                let _lock = acquire_store_write_lock(&store.path).await?;
                quarantine_corrupt_file(&store.path, &reason).await?;
                write_scopes(&store.path, &Scopes::new()).await?;
            }
            Err(err) => return Err(err),
        }

        Ok(store)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn snapshot(&self) -> Result<Scopes> {
        read_scopes(&self.path).await
    }

    async fn ordered_labels(&self, scope: &str) -> Result<Vec<String>> {
        let scopes = self.snapshot().await?;
        let mut labels = scopes
            .get(self.partition.resolve(scope))
            .map(|record| record.labels.clone())
            .unwrap_or_default();
        self.order.arrange(&mut labels);
        Ok(labels)
    }

    /// Read-modify-write under both locks. `apply` returns its output and whether
    /// the state changed; unchanged state is not rewritten.
    async fn update<T, F>(&self, apply: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(&mut Scopes) -> (T, bool) + Send,
    {
        let _gate = self.write_gate.lock().await;
        let _lock = acquire_store_write_lock(&self.path).await?;

        let mut scopes = match read_scopes(&self.path).await {
            Ok(scopes) => scopes,
            Err(StoreError::Corrupt { reason, .. }) => {
                quarantine_corrupt_file(&self.path, &reason).await?;
                Scopes::new()
            }
            Err(err) => return Err(err),
        };

        let (output, changed) = apply(&mut scopes);
        if changed {
            write_scopes(&self.path, &scopes).await?;
        }
        Ok(output)
    }
}

#[async_trait]
impl LabelStore for JsonFileStore {
    async fn add_label(&self, scope: &str, label: &str) -> Result<AddOutcome> {
        let key = self.partition.resolve(scope).to_string();
        let label = label.to_string();
        let outcome = self
            .update(move |scopes| {
                let record = scopes.entry(key).or_default();
                if record.labels.iter().any(|existing| *existing == label) {
                    (AddOutcome::AlreadyExists, false)
                } else {
                    record.labels.push(label);
                    (AddOutcome::Added, true)
                }
            })
            .await?;
        log::debug!("add_label scope={scope} outcome={outcome:?}");
        Ok(outcome)
    }

    async fn labels(&self, scope: &str) -> Result<Vec<String>> {
        self.ordered_labels(scope).await
    }

    async fn labels_page(
        &self,
        scope: &str,
        page_index: usize,
        page_size: usize,
    ) -> Result<LabelPage> {
        let labels = self.ordered_labels(scope).await?;
        let total = labels.len();
        let range = page_range(page_index, page_size, total);
        Ok(LabelPage {
            items: labels[range].to_vec(),
            total,
        })
    }

    async fn search_labels(&self, scope: &str, needle: &str) -> Result<Vec<String>> {
        let mut labels = self.ordered_labels(scope).await?;
        labels.retain(|label| label.contains(needle));
        Ok(labels)
    }

    async fn is_active(&self, scope: &str) -> Result<bool> {
        let scopes = self.snapshot().await?;
        Ok(scopes
            .get(self.partition.resolve(scope))
            .map_or(true, |record| record.active))
    }

    async fn set_active(&self, scope: &str, active: bool) -> Result<()> {
        let key = self.partition.resolve(scope).to_string();
        self.update(move |scopes| {
            scopes.entry(key).or_default().active = active;
            ((), true)
        })
        .await?;
        log::debug!("set_active scope={scope} active={active}");
        Ok(())
    }

    async fn count(&self, scope: &str) -> Result<usize> {
        let scopes = self.snapshot().await?;
        Ok(scopes
            .get(self.partition.resolve(scope))
            .map_or(0, |record| record.labels.len()))
    }

    async fn stats(&self) -> Result<StoreStats> {
        let scopes = self.snapshot().await?;
        Ok(StoreStats {
            scopes: scopes.len(),
            labels: scopes.values().map(|record| record.labels.len()).sum(),
        })
    }

    fn descriptor(&self) -> StoreDescriptor {
        StoreDescriptor {
            backend: Backend::Json,
            partition: self.partition,
            order: self.order,
            location: self.path.display().to_string(),
        }
    }
}

async fn read_scopes(path: &Path) -> Result<Scopes> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Scopes::new()),
        Err(err) => return Err(err.into()),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Scopes::new());
    }
    serde_json::from_slice(&bytes).map_err(|err| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

async fn write_scopes(path: &Path, scopes: &Scopes) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(scopes)?;
    let tmp = sibling_path(path, TEMP_SUFFIX);
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
