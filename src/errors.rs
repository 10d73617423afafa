// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the camera screen
//!
//! The screen knows three kinds of failure: a denied permission, a failed
//! capture and a failed gallery write. Only permission denial blocks the UI;
//! the other two are logged and raised as a dismissible notice.

use std::fmt;

/// Host capability a permission belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Camera capture
    Camera,
    /// Gallery write access
    MediaLibrary,
}

/// Top-level error taxonomy of the camera screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    /// The user (or the host) denied access to a capability
    PermissionDenied(Capability),
    /// Taking the photo failed
    Capture(CaptureError),
    /// Writing the photo to the gallery failed
    Save(SaveError),
}

/// Photo capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// No camera device matches the requested facing
    NoCamera,
    /// No preview frame arrived in time
    NoFrame,
    /// The frame could not be encoded
    Encoding(String),
    /// The capture file could not be written
    Io(String),
    /// Camera backend failure
    Backend(String),
    /// The capability reported success without an image reference
    EmptyReference,
}

/// Gallery write errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    /// Write permission for the gallery is denied
    PermissionDenied,
    /// The captured file no longer exists
    MissingSource(String),
    /// Filesystem error while copying into the gallery
    Io(String),
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Camera => write!(f, "camera"),
            Capability::MediaLibrary => write!(f, "media library"),
        }
    }
}

impl fmt::Display for ScreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenError::PermissionDenied(capability) => {
                write!(f, "Permission denied: {}", capability)
            }
            ScreenError::Capture(e) => write!(f, "Capture error: {}", e),
            ScreenError::Save(e) => write!(f, "Save error: {}", e),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NoCamera => write!(f, "No camera available"),
            CaptureError::NoFrame => write!(f, "No frame available for capture"),
            CaptureError::Encoding(msg) => write!(f, "Encoding failed: {}", msg),
            CaptureError::Io(msg) => write!(f, "Failed to write capture: {}", msg),
            CaptureError::Backend(msg) => write!(f, "Camera backend error: {}", msg),
            CaptureError::EmptyReference => write!(f, "Camera returned an empty image reference"),
        }
    }
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::PermissionDenied => write!(f, "Gallery write permission denied"),
            SaveError::MissingSource(path) => write!(f, "Captured file is missing: {}", path),
            SaveError::Io(msg) => write!(f, "Failed to write to gallery: {}", msg),
        }
    }
}

impl std::error::Error for ScreenError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for SaveError {}

impl From<CaptureError> for ScreenError {
    fn from(err: CaptureError) -> Self {
        ScreenError::Capture(err)
    }
}

impl From<SaveError> for ScreenError {
    fn from(err: SaveError) -> Self {
        ScreenError::Save(err)
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::Io(err.to_string())
    }
}

impl From<std::io::Error> for SaveError {
    fn from(err: std::io::Error) -> Self {
        SaveError::Io(err.to_string())
    }
}

impl From<image::ImageError> for CaptureError {
    fn from(err: image::ImageError) -> Self {
        CaptureError::Encoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_error_wraps_sub_errors() {
        let err: ScreenError = CaptureError::NoFrame.into();
        assert_eq!(err, ScreenError::Capture(CaptureError::NoFrame));
        assert_eq!(
            err.to_string(),
            "Capture error: No frame available for capture"
        );
    }

    #[test]
    fn test_io_error_becomes_save_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: SaveError = io.into();
        assert!(matches!(err, SaveError::Io(ref msg) if msg.contains("read-only")));
    }
}
