// SPDX-License-Identifier: GPL-3.0-only

//! Gallery folder as the media library
//!
//! Write permission is "granted" when the album folder can be created and a
//! marker file can be written to it. Saved assets are copies of the capture
//! named `IMG_<timestamp>.jpg`.

use super::{ImageRef, MediaLibrary, PermissionStatus};
use crate::errors::SaveError;
use crate::storage;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const MARKER_FILE: &str = ".snapcam-write-check";

/// Media library backed by a folder on disk
#[derive(Debug, Clone)]
pub struct GalleryStore {
    dir: PathBuf,
}

impl GalleryStore {
    /// Gallery for an album below the user's pictures folder
    pub fn for_album(album: &str) -> Self {
        Self::new(storage::gallery_dir(album))
    }

    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Check that the folder exists (creating it) and is writable
    pub fn check_writable(dir: &Path) -> PermissionStatus {
        if let Err(e) = std::fs::create_dir_all(dir) {
            warn!(dir = %dir.display(), error = %e, "Cannot create gallery folder");
            return PermissionStatus::Denied;
        }

        let marker = dir.join(MARKER_FILE);
        match std::fs::write(&marker, b"") {
            Ok(()) => {
                let _ = std::fs::remove_file(&marker);
                PermissionStatus::Granted
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Gallery folder not writable");
                PermissionStatus::Denied
            }
        }
    }

    /// Copy `source` into `dir` under a fresh gallery name
    pub fn copy_into(dir: &Path, source: &Path) -> Result<PathBuf, SaveError> {
        if !source.is_file() {
            return Err(SaveError::MissingSource(source.display().to_string()));
        }

        std::fs::create_dir_all(dir)?;
        let stem = storage::gallery_file_stem(chrono::Local::now());
        let target = storage::unique_gallery_path(dir, &stem);
        std::fs::copy(source, &target)?;

        info!(path = %target.display(), "Photo saved to gallery");
        Ok(target)
    }
}

impl MediaLibrary for GalleryStore {
    fn request_write_permission(&self) -> BoxFuture<'static, PermissionStatus> {
        let dir = self.dir.clone();
        async move {
            tokio::task::spawn_blocking(move || Self::check_writable(&dir))
                .await
                .unwrap_or(PermissionStatus::Denied)
        }
        .boxed()
    }

    fn write_asset(&self, image: &ImageRef) -> BoxFuture<'static, Result<PathBuf, SaveError>> {
        let dir = self.dir.clone();
        let source = image.to_path();
        let reference = image.to_string();
        async move {
            let source = source.ok_or(SaveError::MissingSource(reference))?;
            tokio::task::spawn_blocking(move || Self::copy_into(&dir, &source))
                .await
                .map_err(|e| SaveError::Io(format!("Save task error: {}", e)))?
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("snapcam-{}-{}", tag, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_writable_folder_is_granted_and_created() {
        let dir = temp_dir("gallery");
        assert_eq!(GalleryStore::check_writable(&dir), PermissionStatus::Granted);
        assert!(dir.is_dir());
        assert!(!dir.join(MARKER_FILE).exists());
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_uncreatable_folder_is_denied() {
        let blocker = temp_dir("blocker");
        std::fs::write(&blocker, b"file, not a dir").unwrap();
        assert_eq!(
            GalleryStore::check_writable(&blocker.join("album")),
            PermissionStatus::Denied
        );
        std::fs::remove_file(blocker).ok();
    }

    #[test]
    fn test_copy_into_gallery() {
        let dir = temp_dir("gallery");
        let source = temp_dir("source").with_extension("jpg");
        std::fs::write(&source, b"jpeg").unwrap();

        let first = GalleryStore::copy_into(&dir, &source).unwrap();
        let second = GalleryStore::copy_into(&dir, &source).unwrap();
        assert_ne!(first, second);
        assert_eq!(std::fs::read(&first).unwrap(), b"jpeg");
        assert!(source.exists(), "source is copied, not moved");

        std::fs::remove_dir_all(dir).ok();
        std::fs::remove_file(source).ok();
    }

    #[test]
    fn test_missing_source() {
        let dir = temp_dir("gallery");
        let result = GalleryStore::copy_into(&dir, Path::new("/nonexistent/snapcam.jpg"));
        assert!(matches!(result, Err(SaveError::MissingSource(_))));
    }

    #[test]
    fn test_write_asset_rejects_non_file_reference() {
        let store = GalleryStore::new(temp_dir("gallery"));
        let result = futures::executor::block_on(store.write_asset(&ImageRef::new("img://1")));
        assert!(matches!(result, Err(SaveError::MissingSource(_))));
    }
}
