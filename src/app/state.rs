// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::app::effects::Capabilities;
use crate::app::screen::{CameraScreen, Outcome};
use crate::backends::camera::{CameraDevice, CameraFrame, Facing, PipeWireCamera};
use crate::backends::{CaptureRequest, ImageRef};
use crate::config::Config;
use cosmic::cosmic_config;
use cosmic::widget::about::About;
use std::sync::Arc;

/// Photo shown by the review view
#[derive(Debug, Clone)]
pub struct ReviewImage {
    /// Capture the handle was loaded from
    pub image: ImageRef,
    pub handle: cosmic::widget::image::Handle,
}

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Camera screen state machine
    pub screen: CameraScreen,
    /// Concrete camera, for flash strategy and the preview frame slot
    pub camera: Arc<PipeWireCamera>,
    /// Capability handles the screen's effects run against
    pub capabilities: Capabilities,
    /// Cameras found at startup (`None` until enumeration finished)
    pub cameras: Option<Vec<CameraDevice>>,
    /// Latest preview frame
    pub current_frame: Option<Arc<CameraFrame>>,
    /// Photo being reviewed, once decoded
    pub review_image: Option<ReviewImage>,
    /// White overlay shown before a screen-flash capture
    pub screen_flash_active: bool,
}

impl AppModel {
    /// Camera the preview should run for the current facing
    pub fn active_device(&self) -> Option<&CameraDevice> {
        let cameras = self.cameras.as_deref()?;
        crate::backends::camera::select_for_facing(cameras, self.screen.facing())
    }

    /// Whether the live preview is mirrored
    pub fn mirror_preview(&self) -> bool {
        self.config.mirror_front_preview && self.screen.facing() == Facing::Front
    }
}

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
}

/// Messages emitted by the application and its widgets.
///
/// - **UI Navigation**: context pages, external URLs, notices
/// - **Camera**: enumeration, preview frames
/// - **Screen**: permission, capture, review actions and their outcomes
/// - **Settings**: configuration
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page
    ToggleContextPage(ContextPage),
    /// Close the notice dialog
    DismissNotice,

    // ===== Camera =====
    /// Cameras enumerated asynchronously during startup
    CamerasEnumerated(Vec<CameraDevice>),
    /// New camera frame received from pipeline
    CameraFrame(Arc<CameraFrame>),

    // ===== Permission =====
    /// Re-request camera access from the permission prompt
    RequestCameraPermission,

    // ===== Capture =====
    ToggleFlash,
    ToggleFacing,
    /// Capture trigger
    Capture,
    /// Screen flash overlay finished; run the capture
    ScreenFlashComplete(CaptureRequest),

    // ===== Review =====
    Retake,
    Save,
    /// Review image loaded (`None` if the file could not be read)
    ReviewImageLoaded(ImageRef, Option<cosmic::widget::image::Handle>),

    // ===== Effects =====
    /// A screen effect finished
    Outcome(Outcome),

    // ===== Settings =====
    /// Update configuration
    UpdateConfig(Config),
}
