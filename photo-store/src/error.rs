use std::fmt;

/// Error type for photo store operations
#[derive(Debug)]
pub enum PhotoStoreError {
    /// JPEG encoding failed
    EncodeError(String),
    /// Decoding stored bytes back into a pixel buffer failed
    DecodeError(String),
    /// Filesystem error
    IoError(std::io::Error),
    /// The shared catalog refused the insert (no handle returned)
    CatalogRejected(String),
    /// General error
    Other(String),
}

impl fmt::Display for PhotoStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoStoreError::EncodeError(msg) => write!(f, "Encode error: {}", msg),
            PhotoStoreError::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            PhotoStoreError::IoError(e) => write!(f, "IO error: {}", e),
            PhotoStoreError::CatalogRejected(msg) => write!(f, "Catalog rejected: {}", msg),
            PhotoStoreError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for PhotoStoreError {}

impl From<std::io::Error> for PhotoStoreError {
    fn from(err: std::io::Error) -> Self {
        PhotoStoreError::IoError(err)
    }
}
