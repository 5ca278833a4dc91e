use crate::config::{Backend, LabelOrder, Partition};
use crate::error::{Result, StoreError};
use crate::paths::{ensure_parent_dir, quarantine_corrupt_file, sibling_path};
use crate::store::LabelStore;
use crate::types::{AddOutcome, LabelPage, StoreDescriptor, StoreStats};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS labels (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    scope TEXT NOT NULL,
    label TEXT NOT NULL,
    UNIQUE (scope, label)
);
CREATE TABLE IF NOT EXISTS scopes (
    scope TEXT PRIMARY KEY,
    active INTEGER NOT NULL DEFAULT 1
);
";

/// Relational backend: one `labels` table with a UNIQUE `(scope, label)` key and
/// a `scopes` table for the active flag. Under [`Partition::Global`] every row
/// carries the global scope key. A file that is not a readable database is moved
/// aside on open, like a malformed JSON store.
pub struct SqliteStore {
    pool: SqlitePool,
    path: PathBuf,
    partition: Partition,
    order: LabelOrder,
}

impl SqliteStore {
    pub async fn open(
        path: impl AsRef<Path>,
        partition: Partition,
        order: LabelOrder,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent_dir(&path).await?;

        let pool = match connect(&path).await {
            Ok(pool) => pool,
            Err(err) if is_corruption(&err) => {
                quarantine_corrupt_file(&path, &err.to_string()).await?;
                for suffix in ["-wal", "-shm"] {
                    match tokio::fs::remove_file(sibling_path(&path, suffix)).await {
                        Err(err) if err.kind() != std::io::ErrorKind::NotFound => {
                            return Err(err.into())
                        }
                        _ => {}
                    }
                }
                connect(&path).await?
            }
            Err(err) => return Err(err.into()),
        };

        log::info!(
            "Opened SQLite store at {:?} (partition={partition}, order={order})",
            path
        );

        Ok(Self {
            pool,
            path,
            partition,
            order,
        })
    }

    const fn order_clause(&self) -> &'static str {
        match self.order {
            LabelOrder::Insertion => "ORDER BY id",
            LabelOrder::Sorted => "ORDER BY label",
        }
    }

    async fn fetch_labels(&self, scope: &str) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT label FROM labels WHERE scope = ? {}",
            self.order_clause()
        );
        let labels = sqlx::query_scalar::<_, String>(&sql)
            .bind(self.partition.resolve(scope))
            .fetch_all(&self.pool)
            .await?;
        Ok(labels)
    }
}

/// Opens the pool and creates the schema. The pool is closed again when the
/// schema step fails so the file can be moved.
async fn connect(path: &Path) -> std::result::Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);
    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await?;

    if let Err(err) = sqlx::raw_sql(SCHEMA).execute(&pool).await {
        pool.close().await;
        return Err(err);
    }
    Ok(pool)
}

/// SQLITE_CORRUPT (11) or SQLITE_NOTADB (26), extended codes included.
fn is_corruption(err: &sqlx::Error) -> bool {
    let sqlx::Error::Database(db) = err else {
        return false;
    };
    db.code()
        .and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| matches!(code & 0xff, 11 | 26))
}

fn to_sql_int(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn from_sql_count(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

#[async_trait]
impl LabelStore for SqliteStore {
    async fn add_label(&self, scope: &str, label: &str) -> Result<AddOutcome> {
        let key = self.partition.resolve(scope);
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT OR IGNORE INTO scopes (scope, active) VALUES (?, 1)")
            .bind(key)
            .execute(&mut *tx)
            .await?;

        let inserted = sqlx::query("INSERT INTO labels (scope, label) VALUES (?, ?)")
            .bind(key)
            .bind(label)
            .execute(&mut *tx)
            .await;

        let outcome = match inserted {
            Ok(_) => {
                tx.commit().await?;
                AddOutcome::Added
            }
            // A concurrent writer won the race; the UNIQUE key makes it visible here.
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                tx.rollback().await?;
                AddOutcome::AlreadyExists
            }
            Err(err) => return Err(StoreError::DatabaseError(err)),
        };
        log::debug!("add_label scope={scope} outcome={outcome:?}");
        Ok(outcome)
    }

    async fn labels(&self, scope: &str) -> Result<Vec<String>> {
        self.fetch_labels(scope).await
    }

    async fn labels_page(
        &self,
        scope: &str,
        page_index: usize,
        page_size: usize,
    ) -> Result<LabelPage> {
        let key = self.partition.resolve(scope);
        let mut tx = self.pool.begin().await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM labels WHERE scope = ?")
            .bind(key)
            .fetch_one(&mut *tx)
            .await?;

        let items = if page_size == 0 {
            Vec::new()
        } else {
            let sql = format!(
                "SELECT label FROM labels WHERE scope = ? {} LIMIT ? OFFSET ?",
                self.order_clause()
            );
            sqlx::query_scalar::<_, String>(&sql)
                .bind(key)
                .bind(to_sql_int(page_size))
                .bind(to_sql_int(page_index.saturating_mul(page_size)))
                .fetch_all(&mut *tx)
                .await?
        };
        tx.commit().await?;

        Ok(LabelPage {
            items,
            total: from_sql_count(total),
        })
    }

    async fn search_labels(&self, scope: &str, needle: &str) -> Result<Vec<String>> {
        if needle.is_empty() {
            return self.fetch_labels(scope).await;
        }
        // instr() is case-sensitive, unlike LIKE.
        let sql = format!(
            "SELECT label FROM labels WHERE scope = ? AND instr(label, ?) > 0 {}",
            self.order_clause()
        );
        let labels = sqlx::query_scalar::<_, String>(&sql)
            .bind(self.partition.resolve(scope))
            .bind(needle)
            .fetch_all(&self.pool)
            .await?;
        Ok(labels)
    }

    async fn is_active(&self, scope: &str) -> Result<bool> {
        let active: Option<i64> = sqlx::query_scalar("SELECT active FROM scopes WHERE scope = ?")
            .bind(self.partition.resolve(scope))
            .fetch_optional(&self.pool)
            .await?;
        Ok(active.map_or(true, |flag| flag != 0))
    }

    async fn set_active(&self, scope: &str, active: bool) -> Result<()> {
        sqlx::query(
            "INSERT INTO scopes (scope, active) VALUES (?, ?)
             ON CONFLICT(scope) DO UPDATE SET active = excluded.active",
        )
        .bind(self.partition.resolve(scope))
        .bind(i64::from(active))
        .execute(&self.pool)
        .await?;
        log::debug!("set_active scope={scope} active={active}");
        Ok(())
    }

    async fn count(&self, scope: &str) -> Result<usize> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM labels WHERE scope = ?")
            .bind(self.partition.resolve(scope))
            .fetch_one(&self.pool)
            .await?;
        Ok(from_sql_count(count))
    }

    async fn stats(&self) -> Result<StoreStats> {
        let (scopes,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM (SELECT scope FROM scopes UNION SELECT scope FROM labels)",
        )
        .fetch_one(&self.pool)
        .await?;
        let (labels,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM labels")
            .fetch_one(&self.pool)
            .await?;
        Ok(StoreStats {
            scopes: from_sql_count(scopes),
            labels: from_sql_count(labels),
        })
    }

    fn descriptor(&self) -> StoreDescriptor {
        StoreDescriptor {
            backend: Backend::Sqlite,
            partition: self.partition,
            order: self.order,
            location: self.path.display().to_string(),
        }
    }
}
