#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bad magic number: expected {expected:?}, found {found:?}")]
    BadMagic { expected: [u8; 4], found: [u8; 4] },

    #[error("Unsupported {kind} blob version {found} (supported: {supported})")]
    UnsupportedVersion {
        kind: &'static str,
        found: u16,
        supported: u16,
    },

    #[error("Corrupt blob: {0}")]
    Corrupt(String),

    #[error("Catalog '{catalog}' overflow: {len} entries do not fit a 16-bit index")]
    CatalogOverflow { catalog: &'static str, len: usize },

    #[error("Field '{field}' overflow: {len} entries exceed the encoded width")]
    FieldOverflow { field: &'static str, len: usize },

    #[error("Skip rate exceeded: {skipped} of {total} records skipped (limit {limit})")]
    SkipRateExceeded {
        skipped: usize,
        total: usize,
        limit: f64,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl StoreError {
    /// True for errors that mean a blob cannot be trusted at all (bad header,
    /// unsupported layout, or a record body out of sync with its encoder).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            StoreError::BadMagic { .. }
                | StoreError::UnsupportedVersion { .. }
                | StoreError::Corrupt(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
