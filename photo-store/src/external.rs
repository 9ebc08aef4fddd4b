use crate::codec;
use crate::error::PhotoStoreError;
use crate::models::PhotoStoreConfig;
use chrono::{DateTime, Utc};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Metadata row for a shared media catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaRecord {
    pub display_name: String,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    pub added_at: DateTime<Utc>,
}

/// Opaque handle returned by a catalog insert
///
/// Only valid against the catalog that produced it; not retained after the
/// write completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHandle(pub u64);

/// The shared media catalog as this app sees it
///
/// The platform owns the physical storage location; this app only inserts a
/// record, streams bytes to it, and (in tooling) queries what was inserted.
/// The UI never enumerates external photos.
pub trait MediaCatalog: Send + Sync {
    /// Creates a catalog record; `Ok(None)` means the catalog refused the
    /// insert and returned no handle
    fn insert(&self, record: MediaRecord) -> Result<Option<MediaHandle>, PhotoStoreError>;

    /// Opens the write stream backing a previously inserted record
    fn open_output(&self, handle: &MediaHandle) -> Result<Box<dyn Write + Send>, PhotoStoreError>;

    /// Returns the records known to the catalog
    fn query(&self) -> Result<Vec<MediaRecord>, PhotoStoreError>;
}

#[derive(Default, Serialize, Deserialize)]
struct CatalogState {
    next_id: u64,
    entries: Vec<CatalogEntry>,
}

#[derive(Serialize, Deserialize)]
struct CatalogEntry {
    id: u64,
    record: MediaRecord,
}

/// Directory-backed media catalog for desktop builds and tests
///
/// Stands in for the platform media index: files land in a shared pictures
/// directory and the record metadata is kept in a JSON index beside them.
pub struct FsMediaCatalog {
    dir: PathBuf,
    state: Mutex<CatalogState>,
}

impl FsMediaCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let state = Self::load_index(&dir).unwrap_or_default();
        Self {
            dir,
            state: Mutex::new(state),
        }
    }

    fn index_path(dir: &Path) -> PathBuf {
        dir.join(".catalog.json")
    }

    fn load_index(dir: &Path) -> Option<CatalogState> {
        let bytes = fs::read(Self::index_path(dir)).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    fn persist_index(&self, state: &CatalogState) -> Result<(), PhotoStoreError> {
        let json = serde_json::to_vec_pretty(state)
            .map_err(|e| PhotoStoreError::Other(format!("Catalog index serialize: {}", e)))?;
        fs::write(Self::index_path(&self.dir), json)?;
        Ok(())
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, CatalogState>, PhotoStoreError> {
        self.state
            .lock()
            .map_err(|_| PhotoStoreError::Other("Catalog index lock poisoned".to_string()))
    }
}

impl MediaCatalog for FsMediaCatalog {
    fn insert(&self, record: MediaRecord) -> Result<Option<MediaHandle>, PhotoStoreError> {
        fs::create_dir_all(&self.dir)?;

        let mut state = self.lock_state()?;
        let id = state.next_id;
        state.next_id += 1;
        state.entries.push(CatalogEntry { id, record });
        self.persist_index(&state)?;

        Ok(Some(MediaHandle(id)))
    }

    fn open_output(&self, handle: &MediaHandle) -> Result<Box<dyn Write + Send>, PhotoStoreError> {
        let state = self.lock_state()?;
        let entry = state
            .entries
            .iter()
            .find(|e| e.id == handle.0)
            .ok_or_else(|| {
                PhotoStoreError::Other(format!("No catalog entry for handle {}", handle.0))
            })?;

        let file = fs::File::create(self.dir.join(&entry.record.display_name))?;
        Ok(Box::new(file))
    }

    fn query(&self) -> Result<Vec<MediaRecord>, PhotoStoreError> {
        let state = self.lock_state()?;
        Ok(state.entries.iter().map(|e| e.record.clone()).collect())
    }
}

/// Write-only store for the shared media catalog
///
/// Precondition: the caller has verified write permission. Saves are
/// fire-and-forget; there is no read-back or listing path through this
/// store.
pub struct ExternalPhotoStore {
    catalog: Arc<dyn MediaCatalog>,
    jpeg_quality: u8,
}

impl ExternalPhotoStore {
    pub fn new(catalog: Arc<dyn MediaCatalog>, config: &PhotoStoreConfig) -> Self {
        Self {
            catalog,
            jpeg_quality: config.jpeg_quality,
        }
    }

    /// Inserts a record named `<name>.jpg` with the buffer's dimensions and
    /// streams the JPEG-encoded bytes to it
    pub fn save(&self, name: &str, image: &DynamicImage) -> Result<(), PhotoStoreError> {
        let record = MediaRecord {
            display_name: format!("{}.jpg", name),
            mime_type: "image/jpeg".to_string(),
            width: image.width(),
            height: image.height(),
            added_at: Utc::now(),
        };

        let handle = self.catalog.insert(record)?.ok_or_else(|| {
            PhotoStoreError::CatalogRejected("Couldn't create media store entry".to_string())
        })?;

        let bytes = codec::encode_jpeg(image, self.jpeg_quality)?;
        let mut stream = self.catalog.open_output(&handle)?;
        stream.write_all(&bytes)?;

        log::debug!("Saved shared photo: {}.jpg", name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    struct RejectingCatalog;

    impl MediaCatalog for RejectingCatalog {
        fn insert(&self, _record: MediaRecord) -> Result<Option<MediaHandle>, PhotoStoreError> {
            Ok(None)
        }

        fn open_output(
            &self,
            _handle: &MediaHandle,
        ) -> Result<Box<dyn Write + Send>, PhotoStoreError> {
            unreachable!("no handle was ever returned")
        }

        fn query(&self) -> Result<Vec<MediaRecord>, PhotoStoreError> {
            Ok(Vec::new())
        }
    }

    fn green_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([0, 255, 0])))
    }

    #[test]
    fn test_save_writes_file_and_record() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(FsMediaCatalog::new(dir.path()));
        let store = ExternalPhotoStore::new(catalog.clone(), &PhotoStoreConfig::default());

        store.save("sunset", &green_image(32, 16)).unwrap();

        assert!(dir.path().join("sunset.jpg").exists());

        let records = catalog.query().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display_name, "sunset.jpg");
        assert_eq!(records[0].mime_type, "image/jpeg");
        assert_eq!(records[0].width, 32);
        assert_eq!(records[0].height, 16);
    }

    #[test]
    fn test_refused_insert_is_an_error() {
        let store =
            ExternalPhotoStore::new(Arc::new(RejectingCatalog), &PhotoStoreConfig::default());

        let result = store.save("shot", &green_image(4, 4));
        assert!(matches!(result, Err(PhotoStoreError::CatalogRejected(_))));
    }

    #[test]
    fn test_index_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let catalog = Arc::new(FsMediaCatalog::new(dir.path()));
            let store = ExternalPhotoStore::new(catalog, &PhotoStoreConfig::default());
            store.save("first", &green_image(8, 8)).unwrap();
        }

        let reopened = FsMediaCatalog::new(dir.path());
        let records = reopened.query().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display_name, "first.jpg");
    }
}
