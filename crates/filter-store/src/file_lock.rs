use crate::paths::{ensure_parent_dir, sibling_path, LOCK_SUFFIX};
use crate::{Result, StoreError};
use fs2::FileExt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

static STORE_WRITE_LOCK_WAIT_MS_LAST: AtomicU64 = AtomicU64::new(0);
static STORE_WRITE_LOCK_WAIT_MS_MAX: AtomicU64 = AtomicU64::new(0);

pub fn store_write_lock_wait_ms_last() -> u64 {
    STORE_WRITE_LOCK_WAIT_MS_LAST.load(Ordering::Relaxed)
}

pub fn store_write_lock_wait_ms_max() -> u64 {
    STORE_WRITE_LOCK_WAIT_MS_MAX.load(Ordering::Relaxed)
}

fn update_write_lock_wait_ms(wait_ms: u64) {
    STORE_WRITE_LOCK_WAIT_MS_LAST.store(wait_ms, Ordering::Relaxed);
    STORE_WRITE_LOCK_WAIT_MS_MAX.fetch_max(wait_ms, Ordering::Relaxed);
}

/// Exclusive advisory lock on `<store file>.lock`, released on drop.
pub(crate) struct StoreWriteLock {
    file: std::fs::File,
}

impl Drop for StoreWriteLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

pub(crate) async fn acquire_store_write_lock(store_path: &Path) -> Result<StoreWriteLock> {
    let path = sibling_path(store_path, LOCK_SUFFIX);
    ensure_parent_dir(&path).await?;

    tokio::task::spawn_blocking(move || -> Result<StoreWriteLock> {
        use std::fs::OpenOptions;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|err| {
                StoreError::LockError(format!("open store lock {}: {err}", path.display()))
            })?;

        let start = Instant::now();
        file.lock_exclusive().map_err(|err| {
            StoreError::LockError(format!("acquire store lock {}: {err}", path.display()))
        })?;
        update_write_lock_wait_ms(u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX));

        Ok(StoreWriteLock { file })
    })
    .await
    .map_err(|err| StoreError::LockError(format!("join store lock task: {err}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lock_is_reacquirable_after_drop() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = tmp.path().join("nested").join("anime_data.json");

        let first = acquire_store_write_lock(&store).await.unwrap();
        drop(first);
        let _second = acquire_store_write_lock(&store).await.unwrap();

        assert!(sibling_path(&store, LOCK_SUFFIX).exists());
    }
}
