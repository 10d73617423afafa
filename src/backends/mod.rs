// SPDX-License-Identifier: GPL-3.0-only

//! Host capabilities used by the camera screen
//!
//! The screen talks to two capabilities through trait objects:
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │          CameraScreen (app layer)         │
//! └───────────────┬──────────────┬───────────┘
//!                 │              │
//!      ┌──────────┴─────┐  ┌─────┴───────────┐
//!      │CameraCapability│  │  MediaLibrary   │
//!      └──────────┬─────┘  └─────┬───────────┘
//!                 │              │
//!   ┌─────────────┴──────┐  ┌────┴────────────┐
//!   │ PipeWire/GStreamer │  │ Gallery folder  │
//!   │  + camera portal   │  │ (XDG pictures)  │
//!   └────────────────────┘  └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: PipeWire camera enumeration, preview pipeline and still capture
//! - [`gallery`]: Gallery write permission and asset writes
//! - [`portal`]: XDG desktop portal camera access

pub mod camera;
pub mod gallery;
pub mod portal;

use crate::backends::camera::Facing;
use crate::errors::{CaptureError, SaveError};
use crate::flash::FlashMode;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};

/// Tri-state permission status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionStatus {
    /// Not yet determined
    #[default]
    Unknown,
    /// Access granted
    Granted,
    /// Access denied
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }
}

/// Opaque reference to a captured photo
///
/// Conceptually a local file. References produced by the camera backend are
/// `file://` URIs; other schemes are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Build a `file://` reference for a local path
    pub fn from_path(path: &Path) -> Self {
        Self(format!("file://{}", path.display()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Local filesystem path, if this reference points at one
    pub fn to_path(&self) -> Option<PathBuf> {
        if let Some(rest) = self.0.strip_prefix("file://") {
            return Some(PathBuf::from(rest));
        }
        let path = Path::new(&self.0);
        path.is_absolute().then(|| path.to_path_buf())
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parameters of a still capture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureRequest {
    pub facing: Facing,
    pub flash: FlashMode,
    /// 0.0 - 1.0, 1.0 = maximum quality
    pub quality: f32,
}

/// Camera capability: permission plus "capture current frame to a file"
pub trait CameraCapability: Send + Sync {
    /// Query (and if needed request) access to the camera
    fn request_permission(&self) -> BoxFuture<'static, PermissionStatus>;

    /// Capture a still photo and return a reference to the written file
    fn capture_still(
        &self,
        request: CaptureRequest,
    ) -> BoxFuture<'static, Result<ImageRef, CaptureError>>;

    /// Remove a capture that will not be saved
    fn discard(&self, image: &ImageRef) -> BoxFuture<'static, ()>;
}

/// Media library capability: "write a file to the gallery"
pub trait MediaLibrary: Send + Sync {
    /// Request permission to write to the gallery
    fn request_write_permission(&self) -> BoxFuture<'static, PermissionStatus>;

    /// Copy the referenced photo into the gallery, returning the new location
    fn write_asset(&self, image: &ImageRef) -> BoxFuture<'static, Result<PathBuf, SaveError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_ref_file_uri_round_trips_path() {
        let path = Path::new("/tmp/snapcam/a.jpg");
        let image = ImageRef::from_path(path);
        assert_eq!(image.as_str(), "file:///tmp/snapcam/a.jpg");
        assert_eq!(image.to_path().as_deref(), Some(path));
    }

    #[test]
    fn test_image_ref_opaque_scheme_has_no_path() {
        let image = ImageRef::new("img://1");
        assert!(!image.is_empty());
        assert_eq!(image.to_path(), None);
    }

    #[test]
    fn test_blank_image_ref_is_empty() {
        assert!(ImageRef::new("  ").is_empty());
    }
}
