use std::fmt;

/// Central error types for the photo vault app
#[derive(Debug)]
pub enum AppError {
    /// Photo store error (internal directory or shared catalog)
    PhotoStore(photo_store::PhotoStoreError),
    /// Image processing error
    ImageProcessing(String),
    /// General error
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::PhotoStore(e) => write!(f, "Photo store error: {}", e),
            AppError::ImageProcessing(msg) => write!(f, "Image processing error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<photo_store::PhotoStoreError> for AppError {
    fn from(e: photo_store::PhotoStoreError) -> Self {
        AppError::PhotoStore(e)
    }
}

/// User-friendly error messages for the presentation layer
impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::PhotoStore(_) => {
                "Error accessing photo storage. Please try again.".to_string()
            }
            AppError::ImageProcessing(_) => "Error processing image.".to_string(),
            AppError::Other(msg) => msg.clone(),
        }
    }
}
