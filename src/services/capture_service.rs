use crate::permissions::PermissionState;
use image::DynamicImage;
use photo_store::{load_photos, ExternalPhotoStore, InternalPhotoStore, Photo, PhotoStoreError};
use std::sync::Arc;

/// Result of a capture event as reported to the presentation layer
///
/// A single pass/fail signal; no error detail crosses this boundary.
#[derive(Debug)]
pub struct CaptureOutcome {
    pub saved: bool,
    /// Refreshed private listing, when one was produced
    pub photos: Option<Vec<Photo>>,
}

/// Result of a delete request
#[derive(Debug)]
pub struct DeleteOutcome {
    pub deleted: bool,
    /// Refreshed private listing; `None` when the listing was left untouched
    pub photos: Option<Vec<Photo>>,
}

/// Orchestrates capture events between the two stores and the listing
pub struct PhotoCaptureCoordinator {
    internal: Arc<InternalPhotoStore>,
    external: Arc<ExternalPhotoStore>,
}

impl PhotoCaptureCoordinator {
    pub fn new(internal: Arc<InternalPhotoStore>, external: Arc<ExternalPhotoStore>) -> Self {
        Self { internal, external }
    }

    /// Routes a captured pixel buffer to the store selected by the private
    /// flag and the granted permission state, then refreshes the listing
    ///
    /// The private path refreshes the listing even when the save failed;
    /// this matches the original control flow and is kept deliberately. A
    /// successful save of either kind refreshes once more.
    pub async fn handle_capture(
        &self,
        name: &str,
        image: DynamicImage,
        private: bool,
        perms: PermissionState,
    ) -> CaptureOutcome {
        let saved = if private {
            let store = self.internal.clone();
            let name = name.to_string();
            let result =
                tokio::task::spawn_blocking(move || store.save(&name, &image)).await;
            match result {
                Ok(Ok(())) => true,
                Ok(Err(e)) => {
                    log::error!("Private save failed: {}", e);
                    false
                }
                Err(e) => {
                    log::error!("Private save task failed: {}", e);
                    false
                }
            }
        } else if perms.write_granted {
            let store = self.external.clone();
            let name = name.to_string();
            let result =
                tokio::task::spawn_blocking(move || store.save(&name, &image)).await;
            match result {
                Ok(Ok(())) => true,
                Ok(Err(e)) => {
                    log::error!("Shared save failed: {}", e);
                    false
                }
                Err(e) => {
                    log::error!("Shared save task failed: {}", e);
                    false
                }
            }
        } else {
            // No write is attempted without the grant
            log::warn!("Write permission not granted, dropping capture");
            false
        };

        let mut photos = None;
        if private {
            photos = Some(self.refresh_listing().await);
        }
        if saved {
            photos = Some(self.refresh_listing().await);
        }

        CaptureOutcome { saved, photos }
    }

    /// Deletes a private photo by filename
    ///
    /// The listing is refreshed only when the file existed and was removed;
    /// on failure it is left untouched.
    pub async fn handle_delete(&self, filename: &str) -> DeleteOutcome {
        let store = self.internal.clone();
        let owned = filename.to_string();
        let deleted = match tokio::task::spawn_blocking(move || store.delete(&owned)).await {
            Ok(Ok(existed)) => existed,
            Ok(Err(e)) => {
                log::error!("Failed to delete {}: {}", filename, e);
                false
            }
            Err(e) => {
                log::error!("Delete task failed: {}", e);
                false
            }
        };

        let photos = if deleted {
            Some(self.refresh_listing().await)
        } else {
            None
        };

        DeleteOutcome { deleted, photos }
    }

    /// Current private listing, loaded off the calling task
    pub async fn private_photos(&self) -> Result<Vec<Photo>, PhotoStoreError> {
        load_photos(self.internal.clone()).await
    }

    /// Reloads the private listing, degrading to empty on failure
    async fn refresh_listing(&self) -> Vec<Photo> {
        match self.private_photos().await {
            Ok(photos) => photos,
            Err(e) => {
                log::error!("Failed to load private photos: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use photo_store::{FsMediaCatalog, MediaCatalog, MediaHandle, MediaRecord, PhotoStoreConfig};
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingCatalog {
        inserts: AtomicUsize,
    }

    impl CountingCatalog {
        fn new() -> Self {
            Self {
                inserts: AtomicUsize::new(0),
            }
        }
    }

    impl MediaCatalog for CountingCatalog {
        fn insert(&self, _record: MediaRecord) -> Result<Option<MediaHandle>, PhotoStoreError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            Ok(Some(MediaHandle(0)))
        }

        fn open_output(
            &self,
            _handle: &MediaHandle,
        ) -> Result<Box<dyn Write + Send>, PhotoStoreError> {
            Ok(Box::new(std::io::sink()))
        }

        fn query(&self) -> Result<Vec<MediaRecord>, PhotoStoreError> {
            Ok(Vec::new())
        }
    }

    fn red_image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([255, 0, 0])))
    }

    fn coordinator_with_catalog(
        dir: &TempDir,
        catalog: Arc<dyn MediaCatalog>,
    ) -> PhotoCaptureCoordinator {
        let config = PhotoStoreConfig {
            storage_path: dir.path().join("photos").to_string_lossy().to_string(),
            ..Default::default()
        };
        let internal = Arc::new(InternalPhotoStore::new(config.clone()));
        let external = Arc::new(ExternalPhotoStore::new(catalog, &config));
        PhotoCaptureCoordinator::new(internal, external)
    }

    fn coordinator(dir: &TempDir) -> PhotoCaptureCoordinator {
        let catalog = Arc::new(FsMediaCatalog::new(dir.path().join("pictures")));
        coordinator_with_catalog(dir, catalog)
    }

    #[tokio::test]
    async fn test_private_capture_saves_and_refreshes() {
        let dir = TempDir::new().unwrap();
        let coordinator = coordinator(&dir);

        let outcome = coordinator
            .handle_capture("abc123", red_image(), true, PermissionState::granted())
            .await;

        assert!(outcome.saved);
        let photos = outcome.photos.unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].name, "abc123.jpg");
        assert_eq!(photos[0].pixels.width(), 10);
    }

    #[tokio::test]
    async fn test_failed_private_save_still_refreshes() {
        let dir = TempDir::new().unwrap();
        // A file where the storage directory should be makes the save fail
        std::fs::write(dir.path().join("photos"), b"blocker").unwrap();
        let coordinator = coordinator(&dir);

        let outcome = coordinator
            .handle_capture("abc123", red_image(), true, PermissionState::granted())
            .await;

        assert!(!outcome.saved);
        assert!(outcome.photos.is_some());
    }

    #[tokio::test]
    async fn test_external_capture_without_permission_is_rejected_before_insert() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(CountingCatalog::new());
        let coordinator = coordinator_with_catalog(&dir, catalog.clone());

        let perms = PermissionState {
            read_granted: true,
            write_granted: false,
        };
        let outcome = coordinator
            .handle_capture("abc123", red_image(), false, perms)
            .await;

        assert!(!outcome.saved);
        assert!(outcome.photos.is_none());
        assert_eq!(catalog.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_external_capture_with_permission_inserts_once() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(CountingCatalog::new());
        let coordinator = coordinator_with_catalog(&dir, catalog.clone());

        let outcome = coordinator
            .handle_capture("abc123", red_image(), false, PermissionState::granted())
            .await;

        assert!(outcome.saved);
        assert_eq!(catalog.inserts.load(Ordering::SeqCst), 1);
        // A successful save refreshes the private listing, which stays empty
        assert_eq!(outcome.photos.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_delete_refreshes_only_on_success() {
        let dir = TempDir::new().unwrap();
        let coordinator = coordinator(&dir);

        coordinator
            .handle_capture("abc123", red_image(), true, PermissionState::granted())
            .await;

        let outcome = coordinator.handle_delete("abc123.jpg").await;
        assert!(outcome.deleted);
        assert_eq!(outcome.photos.unwrap().len(), 0);

        let again = coordinator.handle_delete("abc123.jpg").await;
        assert!(!again.deleted);
        assert!(again.photos.is_none());
    }
}
