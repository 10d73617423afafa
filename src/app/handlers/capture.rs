// SPDX-License-Identifier: GPL-3.0-only

//! Live view handlers
//!
//! Handles preview frames, the flash and lens toggles and photo capture.

use crate::app::screen::Effect;
use crate::app::state::{AppModel, Message};
use crate::backends::CaptureRequest;
use crate::backends::camera::{CameraDevice, CameraFrame};
use cosmic::Task;
use std::sync::Arc;
use tracing::{debug, info, warn};

impl AppModel {
    pub(crate) fn handle_cameras_enumerated(
        &mut self,
        cameras: Vec<CameraDevice>,
    ) -> Task<cosmic::Action<Message>> {
        if cameras.is_empty() {
            warn!("No cameras found");
        } else {
            info!(count = cameras.len(), "Cameras available");
        }
        self.cameras = Some(cameras);
        Task::none()
    }

    pub(crate) fn handle_camera_frame(
        &mut self,
        frame: Arc<CameraFrame>,
    ) -> Task<cosmic::Action<Message>> {
        // Late frames from a stopping pipeline
        if self.screen.is_live() {
            self.current_frame = Some(frame);
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_flash(&mut self) -> Task<cosmic::Action<Message>> {
        self.screen.toggle_flash();
        Task::none()
    }

    pub(crate) fn handle_toggle_facing(&mut self) -> Task<cosmic::Action<Message>> {
        self.screen.toggle_facing();
        // Old feed belongs to the other lens
        self.current_frame = None;
        Task::none()
    }

    pub(crate) fn handle_capture(&mut self) -> Task<cosmic::Action<Message>> {
        match self.screen.capture() {
            Some(effect) => self.run_effects([effect]),
            None => {
                debug!("Capture ignored");
                Task::none()
            }
        }
    }

    pub(crate) fn handle_screen_flash_complete(
        &mut self,
        request: CaptureRequest,
    ) -> Task<cosmic::Action<Message>> {
        info!("Screen flash shown - capturing photo");
        // Overlay stays up until the capture outcome arrives
        self.perform_effect(Effect::Capture(request))
    }
}
