#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LibraryError {
    #[error("Library I/O failed at `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Library file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Library state lock was poisoned.")]
    Poisoned,
}
