use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Scope key every chat maps to under [`Partition::Global`].
pub const GLOBAL_SCOPE: &str = "*";

pub const DEFAULT_JSON_PATH: &str = "anime_data.json";
pub const DEFAULT_SQLITE_PATH: &str = "anime_filters.db";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Json,
    Sqlite,
}

impl Backend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }

    #[must_use]
    pub const fn default_path(self) -> &'static str {
        match self {
            Self::Json => DEFAULT_JSON_PATH,
            Self::Sqlite => DEFAULT_SQLITE_PATH,
        }
    }
}

/// How chat identifiers map onto scopes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    /// Every chat owns its own list and active flag.
    #[default]
    Scoped,
    /// All chats share one list.
    Global,
}

impl Partition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scoped => "scoped",
            Self::Global => "global",
        }
    }

    #[must_use]
    pub fn resolve<'a>(self, scope: &'a str) -> &'a str {
        match self {
            Self::Scoped => scope,
            Self::Global => GLOBAL_SCOPE,
        }
    }
}

/// Order in which labels are returned by list, page and search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelOrder {
    #[default]
    Insertion,
    Sorted,
}

impl LabelOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insertion => "insertion",
            Self::Sorted => "sorted",
        }
    }

    /// Reorders labels that are held in insertion order.
    pub fn arrange(self, labels: &mut [String]) {
        if self == Self::Sorted {
            labels.sort_unstable();
        }
    }
}

macro_rules! impl_str_enum {
    ($ty:ty, $what:literal, [$($variant:ident),+]) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let raw = raw.trim().to_ascii_lowercase();
                $(
                    if raw == <$ty>::$variant.as_str() {
                        return Ok(<$ty>::$variant);
                    }
                )+
                let expected = [$(<$ty>::$variant.as_str()),+].join("|");
                Err(format!("unknown {} '{raw}' (expected {expected})", $what))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_str_enum!(Backend, "backend", [Json, Sqlite]);
impl_str_enum!(Partition, "partition", [Scoped, Global]);
impl_str_enum!(LabelOrder, "order", [Insertion, Sorted]);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: Backend,
    /// Defaults to [`Backend::default_path`] when unset.
    pub path: Option<PathBuf>,
    pub partition: Partition,
    pub order: LabelOrder,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Json,
            path: None,
            partition: Partition::Scoped,
            order: LabelOrder::Insertion,
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.backend.default_path()))
    }
}
