use crate::codec;
use crate::error::PhotoStoreError;
use crate::models::{Photo, PhotoStoreConfig};
use image::DynamicImage;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Store for photos in the app-private directory
///
/// Files are plain `<name>.jpg` blobs; the filename is the only identity and
/// the only metadata kept. The directory is assumed single-writer.
pub struct InternalPhotoStore {
    config: PhotoStoreConfig,
}

impl InternalPhotoStore {
    /// Initialize the store with configuration
    pub fn new(config: PhotoStoreConfig) -> Self {
        Self { config }
    }

    fn storage_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.storage_path)
    }

    /// Saves a captured pixel buffer as `<dir>/<name>.jpg`
    ///
    /// An existing file of the same name is replaced. The write is not
    /// staged through a temp file; a crash mid-write can leave a truncated
    /// file.
    pub fn save(&self, name: &str, image: &DynamicImage) -> Result<(), PhotoStoreError> {
        let bytes = codec::encode_jpeg(image, self.config.jpeg_quality)?;
        let dir = self.storage_dir();
        fs::create_dir_all(&dir)?;

        let path = dir.join(format!("{}.jpg", name));
        fs::write(&path, bytes)?;

        log::debug!("Saved photo: {:?}", path);
        Ok(())
    }

    /// Lists and decodes all `.jpg` files in the private directory
    ///
    /// Returned in filesystem enumeration order, not sorted. Entries that
    /// are not regular files, do not end in `.jpg`, or cannot be read or
    /// decoded are skipped. A missing directory yields an empty listing.
    pub fn list(&self) -> Result<Vec<Photo>, PhotoStoreError> {
        let dir = self.storage_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut photos = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = match entry.file_name().to_str() {
                Some(n) if n.ends_with(".jpg") => n.to_string(),
                _ => continue,
            };
            let bytes = match fs::read(&path) {
                Ok(b) => b,
                Err(e) => {
                    log::warn!("Skipping unreadable file {:?}: {}", path, e);
                    continue;
                }
            };
            let pixels = match codec::decode(&bytes) {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("Skipping undecodable file {:?}: {}", path, e);
                    continue;
                }
            };
            photos.push(Photo { name, pixels });
        }

        Ok(photos)
    }

    /// Deletes `<dir>/<filename>`
    ///
    /// Returns whether the file existed and was removed; a missing file is
    /// `Ok(false)`, never an error. Other I/O failures propagate.
    pub fn delete(&self, filename: &str) -> Result<bool, PhotoStoreError> {
        let path = self.storage_dir().join(filename);
        match fs::remove_file(&path) {
            Ok(()) => {
                log::debug!("Deleted photo: {:?}", path);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(PhotoStoreError::IoError(e)),
        }
    }
}

/// Lists photos on the blocking pool to keep read/decode work off the
/// calling task
pub async fn load_photos(store: Arc<InternalPhotoStore>) -> Result<Vec<Photo>, PhotoStoreError> {
    tokio::task::spawn_blocking(move || store.list())
        .await
        .map_err(|e| PhotoStoreError::Other(format!("Task join error: {}", e)))?
}
