//! # Photo Store
//!
//! A reusable photo persistence library for private and shared media storage.
//!
//! This crate provides cross-platform photo persistence, including:
//! - JPEG encoding of captured pixel buffers (quality 95)
//! - A private-directory store with save, list and delete
//! - A write-only store for the shared media catalog
//!
//! ## Platform Separation
//!
//! This crate focuses on cross-platform storage logic. Platform-specific code
//! (permission checks, Android directory resolution) belongs in the
//! application crate; the shared catalog is reached only through the
//! [`MediaCatalog`] trait so platform catalogs can be plugged in.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use photo_store::{InternalPhotoStore, PhotoStoreConfig};
//!
//! let config = PhotoStoreConfig {
//!     storage_path: "/path/to/photos".to_string(),
//!     jpeg_quality: 95,
//! };
//!
//! let store = InternalPhotoStore::new(config);
//! store.save("abc123", &captured_image)?;
//! ```

pub mod codec;
pub mod error;
pub mod external;
pub mod internal;
pub mod models;

pub use codec::{decode, encode_jpeg};
pub use error::PhotoStoreError;
pub use external::{
    ExternalPhotoStore, FsMediaCatalog, MediaCatalog, MediaHandle, MediaRecord,
};
pub use internal::{load_photos, InternalPhotoStore};
pub use models::{Photo, PhotoStoreConfig};
