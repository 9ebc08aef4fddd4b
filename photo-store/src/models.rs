use image::DynamicImage;

/// A decoded photo held in memory for display
///
/// Identity is the filename; nothing outlives the filesystem entry it was
/// decoded from.
#[derive(Debug, Clone)]
pub struct Photo {
    /// Filename including the `.jpg` suffix, without directory
    pub name: String,
    /// Decoded pixel buffer
    pub pixels: DynamicImage,
}

/// Configuration for photo store initialization
#[derive(Debug, Clone)]
pub struct PhotoStoreConfig {
    /// Base directory for private photo storage
    pub storage_path: String,
    /// JPEG quality used when persisting captures
    pub jpeg_quality: u8,
}

impl Default for PhotoStoreConfig {
    fn default() -> Self {
        Self {
            storage_path: String::new(),
            jpeg_quality: 95,
        }
    }
}
