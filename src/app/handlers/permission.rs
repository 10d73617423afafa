// SPDX-License-Identifier: GPL-3.0-only

//! Permission handlers

use crate::app::state::{AppModel, Message};
use cosmic::Task;
use tracing::info;

impl AppModel {
    pub(crate) fn handle_request_camera_permission(&mut self) -> Task<cosmic::Action<Message>> {
        match self.screen.request_camera_permission() {
            Some(effect) => {
                info!("Re-requesting camera permission");
                self.run_effects([effect])
            }
            None => Task::none(),
        }
    }
}
