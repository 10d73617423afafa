// SPDX-License-Identifier: GPL-3.0-only

//! The camera screen state machine
//!
//! `CameraScreen` owns the screen's state and never performs I/O. Every
//! transition that needs a host capability returns [`Effect`]s; the caller
//! executes them (see [`super::effects`]) and feeds each [`Outcome`] back
//! through [`CameraScreen::apply`].
//!
//! ```text
//!            capture succeeds
//!   ┌──────┐ ───────────────▶ ┌───────────┐
//!   │ Live │                  │ Reviewing │ ── save fails ──┐
//!   └──────┘ ◀─────────────── └───────────┘ ◀───────────────┘
//!            retake / save succeeds
//! ```

use crate::backends::camera::Facing;
use crate::backends::{CaptureRequest, ImageRef, PermissionStatus};
use crate::constants::capture;
use crate::errors::{CaptureError, SaveError, ScreenError};
use crate::flash::FlashMode;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Work the screen asks its host to do
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RequestCameraPermission,
    RequestMediaPermission,
    Capture(CaptureRequest),
    Save(ImageRef),
    /// Remove a capture that left the screen without being saved
    Discard(ImageRef),
}

/// Result of an executed [`Effect`]
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    CameraPermission(PermissionStatus),
    MediaPermission(PermissionStatus),
    Captured(Result<ImageRef, CaptureError>),
    Saved {
        image: ImageRef,
        result: Result<PathBuf, SaveError>,
    },
    Discarded,
}

/// One-shot message for the user
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The photo is in the gallery
    Saved(PathBuf),
    CaptureFailed(CaptureError),
    SaveFailed(SaveError),
}

/// Derived capture mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Live,
    Reviewing,
}

/// What the screen should render
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenView<'a> {
    /// Camera permission not determined yet
    Blank,
    /// Camera permission denied; offer a re-request
    PermissionPrompt { requesting: bool },
    Live {
        facing: Facing,
        flash: FlashMode,
        capture_pending: bool,
    },
    Reviewing {
        image: &'a ImageRef,
        save_pending: bool,
    },
}

#[derive(Debug, Clone)]
pub struct CameraScreen {
    camera_permission: PermissionStatus,
    media_permission: PermissionStatus,
    image: Option<ImageRef>,
    facing: Facing,
    flash: FlashMode,
    quality: f32,
    capture_pending: bool,
    save_pending: bool,
    camera_request_pending: bool,
    notice: Option<Notice>,
    mounted: bool,
}

impl Default for CameraScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraScreen {
    pub fn new() -> Self {
        Self {
            camera_permission: PermissionStatus::Unknown,
            media_permission: PermissionStatus::Unknown,
            image: None,
            facing: Facing::default(),
            flash: FlashMode::default(),
            quality: capture::DEFAULT_QUALITY,
            capture_pending: false,
            save_pending: false,
            camera_request_pending: false,
            notice: None,
            mounted: false,
        }
    }

    /// Capture quality handed to the camera (0.0 - 1.0)
    pub fn with_quality(mut self, quality: f32) -> Self {
        self.set_quality(quality);
        self
    }

    pub fn set_quality(&mut self, quality: f32) {
        self.quality = if quality.is_finite() {
            quality.clamp(0.0, 1.0)
        } else {
            capture::DEFAULT_QUALITY
        };
    }

    pub fn camera_permission(&self) -> PermissionStatus {
        self.camera_permission
    }

    pub fn media_permission(&self) -> PermissionStatus {
        self.media_permission
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn flash(&self) -> FlashMode {
        self.flash
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_capture_pending(&self) -> bool {
        self.capture_pending
    }

    pub fn is_save_pending(&self) -> bool {
        self.save_pending
    }

    pub fn mode(&self) -> CaptureMode {
        if self.image.is_some() {
            CaptureMode::Reviewing
        } else {
            CaptureMode::Live
        }
    }

    /// Screen appeared: ask for both permissions, once
    pub fn mount(&mut self) -> Vec<Effect> {
        if self.mounted {
            return Vec::new();
        }
        self.mounted = true;
        self.camera_request_pending = true;
        vec![Effect::RequestMediaPermission, Effect::RequestCameraPermission]
    }

    /// User asked to retry camera access from the permission prompt
    pub fn request_camera_permission(&mut self) -> Option<Effect> {
        if self.camera_permission == PermissionStatus::Granted || self.camera_request_pending {
            return None;
        }
        self.camera_request_pending = true;
        Some(Effect::RequestCameraPermission)
    }

    pub fn toggle_flash(&mut self) {
        if self.is_live() {
            self.flash = self.flash.toggled();
            debug!(flash = ?self.flash, "Flash toggled");
        }
    }

    pub fn toggle_facing(&mut self) {
        if self.is_live() {
            self.facing = self.facing.toggled();
            debug!(facing = %self.facing, "Facing toggled");
        }
    }

    /// Capture trigger; ignored unless Live with camera access and idle
    pub fn capture(&mut self) -> Option<Effect> {
        if !self.is_live() || self.capture_pending {
            return None;
        }
        self.capture_pending = true;
        Some(Effect::Capture(self.capture_request()))
    }

    /// Parameters the next capture will use
    pub fn capture_request(&self) -> CaptureRequest {
        CaptureRequest {
            facing: self.facing,
            flash: self.flash,
            quality: self.quality,
        }
    }

    /// Drop the reviewed photo and go back to Live
    pub fn retake(&mut self) -> Option<Effect> {
        if self.save_pending {
            return None;
        }
        let image = self.image.take()?;
        info!(image = %image, "Retake");
        Some(Effect::Discard(image))
    }

    /// Write the reviewed photo to the gallery
    pub fn save(&mut self) -> Vec<Effect> {
        if self.save_pending {
            return Vec::new();
        }
        let Some(image) = self.image.clone() else {
            return Vec::new();
        };

        if self.media_permission == PermissionStatus::Denied {
            warn!("Save refused: media library permission denied");
            self.notice = Some(Notice::SaveFailed(SaveError::PermissionDenied));
            return vec![Effect::RequestMediaPermission];
        }

        self.save_pending = true;
        vec![Effect::Save(image)]
    }

    /// Feed back the result of an effect
    pub fn apply(&mut self, outcome: Outcome) -> Vec<Effect> {
        match outcome {
            Outcome::CameraPermission(status) => {
                self.camera_request_pending = false;
                // A pending request never downgrades to Unknown
                if status != PermissionStatus::Unknown {
                    self.camera_permission = status;
                }
                info!(status = ?self.camera_permission, "Camera permission");
                Vec::new()
            }
            Outcome::MediaPermission(status) => {
                if status != PermissionStatus::Unknown {
                    self.media_permission = status;
                }
                info!(status = ?self.media_permission, "Media library permission");
                Vec::new()
            }
            Outcome::Captured(result) => {
                self.capture_pending = false;
                match result {
                    Ok(image) if image.is_empty() => {
                        self.capture_failed(CaptureError::EmptyReference);
                        Vec::new()
                    }
                    Ok(image) => {
                        info!(image = %image, "Captured");
                        // A stale capture (should not happen) is discarded, not leaked
                        let stale = self.image.replace(image);
                        stale.map(Effect::Discard).into_iter().collect()
                    }
                    Err(e) => {
                        self.capture_failed(e);
                        Vec::new()
                    }
                }
            }
            Outcome::Saved { image, result } => {
                self.save_pending = false;
                match result {
                    Ok(path) => {
                        info!(path = %path.display(), "Saved to gallery");
                        self.notice = Some(Notice::Saved(path));
                        if self.image.as_ref() == Some(&image) {
                            self.image = None;
                        }
                        vec![Effect::Discard(image)]
                    }
                    Err(e) => {
                        error!(error = %ScreenError::Save(e.clone()), "Failed to save photo");
                        self.notice = Some(Notice::SaveFailed(e));
                        Vec::new()
                    }
                }
            }
            Outcome::Discarded => Vec::new(),
        }
    }

    /// Take the current notice (shown once)
    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn view(&self) -> ScreenView<'_> {
        match self.camera_permission {
            PermissionStatus::Unknown => ScreenView::Blank,
            PermissionStatus::Denied => ScreenView::PermissionPrompt {
                requesting: self.camera_request_pending,
            },
            PermissionStatus::Granted => match &self.image {
                Some(image) => ScreenView::Reviewing {
                    image,
                    save_pending: self.save_pending,
                },
                None => ScreenView::Live {
                    facing: self.facing,
                    flash: self.flash,
                    capture_pending: self.capture_pending,
                },
            },
        }
    }

    /// Live mode with camera access
    pub fn is_live(&self) -> bool {
        self.camera_permission.is_granted() && self.image.is_none()
    }

    fn capture_failed(&mut self, e: CaptureError) {
        error!(error = %ScreenError::Capture(e.clone()), "Failed to capture photo");
        self.notice = Some(Notice::CaptureFailed(e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_screen() -> CameraScreen {
        let mut screen = CameraScreen::new();
        screen.mount();
        screen.apply(Outcome::CameraPermission(PermissionStatus::Granted));
        screen.apply(Outcome::MediaPermission(PermissionStatus::Granted));
        screen
    }

    #[test]
    fn test_mount_requests_both_permissions_once() {
        let mut screen = CameraScreen::new();
        assert_eq!(
            screen.mount(),
            vec![Effect::RequestMediaPermission, Effect::RequestCameraPermission]
        );
        assert!(screen.mount().is_empty());
        assert_eq!(screen.view(), ScreenView::Blank);
    }

    #[test]
    fn test_capture_ignored_without_permission() {
        let mut screen = CameraScreen::new();
        screen.mount();
        assert_eq!(screen.capture(), None);
        screen.apply(Outcome::CameraPermission(PermissionStatus::Denied));
        assert_eq!(screen.capture(), None);
    }

    #[test]
    fn test_capture_is_not_reentrant() {
        let mut screen = live_screen();
        assert!(screen.capture().is_some());
        assert_eq!(screen.capture(), None);
        screen.apply(Outcome::Captured(Err(CaptureError::NoFrame)));
        assert!(screen.capture().is_some());
    }

    #[test]
    fn test_capture_request_carries_quality_and_toggles() {
        let mut screen = live_screen().with_quality(0.5);
        screen.toggle_flash();
        screen.toggle_facing();
        assert_eq!(
            screen.capture(),
            Some(Effect::Capture(CaptureRequest {
                facing: Facing::Front,
                flash: FlashMode::On,
                quality: 0.5,
            }))
        );
    }

    #[test]
    fn test_empty_reference_is_a_capture_failure() {
        let mut screen = live_screen();
        screen.capture();
        screen.apply(Outcome::Captured(Ok(ImageRef::new(""))));
        assert_eq!(screen.mode(), CaptureMode::Live);
        assert_eq!(
            screen.notice(),
            Some(&Notice::CaptureFailed(CaptureError::EmptyReference))
        );
    }

    #[test]
    fn test_toggles_ignored_while_reviewing() {
        let mut screen = live_screen();
        screen.capture();
        screen.apply(Outcome::Captured(Ok(ImageRef::new("img://1"))));
        screen.toggle_flash();
        screen.toggle_facing();
        assert_eq!(screen.flash(), FlashMode::Off);
        assert_eq!(screen.facing(), Facing::Back);
    }

    #[test]
    fn test_retake_blocked_while_saving() {
        let mut screen = live_screen();
        screen.capture();
        screen.apply(Outcome::Captured(Ok(ImageRef::new("img://1"))));
        assert_eq!(screen.save(), vec![Effect::Save(ImageRef::new("img://1"))]);
        assert_eq!(screen.retake(), None);
        assert!(screen.save().is_empty());
    }

    #[test]
    fn test_unknown_permission_never_overrides() {
        let mut screen = live_screen();
        screen.apply(Outcome::CameraPermission(PermissionStatus::Unknown));
        assert_eq!(screen.camera_permission(), PermissionStatus::Granted);
    }

    #[test]
    fn test_quality_is_clamped() {
        assert_eq!(CameraScreen::new().with_quality(3.0).quality(), 1.0);
        assert_eq!(CameraScreen::new().with_quality(f32::NAN).quality(), 1.0);
    }
}
