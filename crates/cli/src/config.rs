use anime_filters_engine::{EngineConfig, DEFAULT_PAGE_SIZE};
use anime_filters_store::{Backend, LabelOrder, Partition, StoreConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_FILE_NAME: &str = "anime-filters.toml";

pub const ENV_BACKEND: &str = "ANIME_FILTERS_BACKEND";
pub const ENV_DATA: &str = "ANIME_FILTERS_DATA";
pub const ENV_PARTITION: &str = "ANIME_FILTERS_PARTITION";
pub const ENV_ORDER: &str = "ANIME_FILTERS_ORDER";
pub const ENV_PAGE_SIZE: &str = "ANIME_FILTERS_PAGE_SIZE";

/// Effective settings: defaults < TOML file < environment < CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub page_size: usize,
    /// `add` splits comma-separated input when set; otherwise the whole
    /// argument is one label.
    pub batch_add: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            page_size: DEFAULT_PAGE_SIZE,
            batch_add: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub backend: Option<Backend>,
    pub data: Option<PathBuf>,
    pub partition: Option<Partition>,
    pub order: Option<LabelOrder>,
    pub page_size: Option<usize>,
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).context("Invalid TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("In config {}", path.display()))
    }

    /// Explicit path must exist; otherwise `anime-filters.toml` in `dir` is used
    /// when present, else defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            log::debug!("Using config {}", candidate.display());
            return Self::load_file(&candidate);
        }
        Ok(Self::default())
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(raw) = lookup(ENV_BACKEND) {
            self.store.backend = parse_env(ENV_BACKEND, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DATA).filter(|raw| !raw.trim().is_empty()) {
            self.store.path = Some(PathBuf::from(raw));
        }
        if let Some(raw) = lookup(ENV_PARTITION) {
            self.store.partition = parse_env(ENV_PARTITION, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ORDER) {
            self.store.order = parse_env(ENV_ORDER, &raw)?;
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            self.page_size = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PAGE_SIZE}={raw:?} is not a page size"))?;
        }
        self.validate()
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        if let Some(backend) = overrides.backend {
            self.store.backend = backend;
        }
        if let Some(data) = &overrides.data {
            self.store.path = Some(data.clone());
        }
        if let Some(partition) = overrides.partition {
            self.store.partition = partition;
        }
        if let Some(order) = overrides.order {
            self.store.order = order;
        }
        if let Some(page_size) = overrides.page_size {
            self.page_size = page_size;
        }
        self.validate()
    }

    #[must_use]
    pub const fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            page_size: self.page_size,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            anyhow::bail!("page_size must be at least 1");
        }
        Ok(())
    }
}

fn parse_env<T: FromStr<Err = String>>(name: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|err: String| anyhow::anyhow!(err))
        .with_context(|| format!("Invalid {name}"))
}
