use anime_filters_store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("No anime name given")]
    EmptyInput,

    #[error("Empty query")]
    EmptyQuery,

    #[error("No anime in the filter list yet")]
    Empty,

    #[error("Filters are currently stopped")]
    Inactive,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),
}

impl FilterError {
    /// Stable wire code for adapters.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::EmptyQuery => "empty_query",
            Self::Empty => "empty",
            Self::Inactive => "inactive",
            Self::StorageUnavailable(_) => "storage_unavailable",
        }
    }
}
