use thiserror::Error;

/// Failure to write the snapshot file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Why a snapshot file could not be loaded. Each cause is reported
/// distinctly; none of them is turned into an empty default here.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open file: {0}")]
    FileOpen(#[source] std::io::Error),

    #[error("failed to read checksum")]
    HashRead,

    #[error("checksum mismatch, data corrupted")]
    ChecksumMismatch,

    #[error("invalid magic message")]
    MagicMessage,

    #[error("invalid network magic number")]
    NetworkMagic,

    #[error("deserialization error: {0}")]
    Format(String),
}

impl LoadError {
    /// Short machine-checkable outcome code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileOpen(_) => "file-error",
            Self::HashRead => "hash-read-error",
            Self::ChecksumMismatch => "incorrect-hash",
            Self::MagicMessage => "incorrect-magic-message",
            Self::NetworkMagic => "incorrect-magic-number",
            Self::Format(_) => "incorrect-format",
        }
    }

    /// The file was intact but its payload would not decode. The caller must
    /// discard any partially loaded state.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}
