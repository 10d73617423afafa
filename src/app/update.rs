// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! This module handles all application messages by routing them to focused handler methods.
//! The main `update()` function acts as a dispatcher, while specific handlers are implemented
//! in the `handlers` submodules organized by functional domain.
//!
//! # Handler Modules
//!
//! - `handlers::ui`: context pages, links, notices, configuration
//! - `handlers::permission`: camera permission re-request
//! - `handlers::capture`: preview frames, toggles, capture
//! - `handlers::review`: retake, save, review image loading

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),
            Message::DismissNotice => self.handle_dismiss_notice(),

            // ===== Camera =====
            Message::CamerasEnumerated(cameras) => self.handle_cameras_enumerated(cameras),
            Message::CameraFrame(frame) => self.handle_camera_frame(frame),

            // ===== Permission =====
            Message::RequestCameraPermission => self.handle_request_camera_permission(),

            // ===== Capture =====
            Message::ToggleFlash => self.handle_toggle_flash(),
            Message::ToggleFacing => self.handle_toggle_facing(),
            Message::Capture => self.handle_capture(),
            Message::ScreenFlashComplete(request) => self.handle_screen_flash_complete(request),

            // ===== Review =====
            Message::Retake => self.handle_retake(),
            Message::Save => self.handle_save(),
            Message::ReviewImageLoaded(image, loaded) => {
                self.handle_review_image_loaded(image, loaded)
            }

            // ===== Effects =====
            Message::Outcome(outcome) => self.handle_outcome(outcome),

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
        }
    }
}
