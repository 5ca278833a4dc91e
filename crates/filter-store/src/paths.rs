use std::path::{Path, PathBuf};

pub const LOCK_SUFFIX: &str = ".lock";
pub const TEMP_SUFFIX: &str = ".tmp";
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// `data/anime_data.json` + `.lock` -> `data/anime_data.json.lock`
#[must_use]
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

#[must_use]
pub fn corrupt_backup_path(store_path: &Path) -> PathBuf {
    sibling_path(store_path, CORRUPT_SUFFIX)
}

/// Moves a malformed store file aside and returns where it went. Earlier
/// backups are kept: `<file>.corrupt`, then `<file>.corrupt.1`, `.2`, ...
pub(crate) async fn quarantine_corrupt_file(path: &Path, reason: &str) -> std::io::Result<PathBuf> {
    let first = corrupt_backup_path(path);
    let mut backup = first.clone();
    let mut attempt = 1u32;
    while tokio::fs::try_exists(&backup).await? {
        backup = sibling_path(&first, &format!(".{attempt}"));
        attempt += 1;
    }
    log::warn!(
        "Store file {} is malformed ({reason}); moving it to {} and starting empty",
        path.display(),
        backup.display()
    );
    tokio::fs::rename(path, &backup).await?;
    Ok(backup)
}

pub(crate) async fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}
