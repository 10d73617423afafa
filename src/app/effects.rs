// SPDX-License-Identifier: GPL-3.0-only

//! Executes screen effects against the host capabilities

use super::screen::{CameraScreen, Effect, Outcome};
use crate::backends::{CameraCapability, MediaLibrary};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Capability handles shared by every effect
#[derive(Clone)]
pub struct Capabilities {
    pub camera: Arc<dyn CameraCapability>,
    pub library: Arc<dyn MediaLibrary>,
}

impl Capabilities {
    pub fn new(camera: Arc<dyn CameraCapability>, library: Arc<dyn MediaLibrary>) -> Self {
        Self { camera, library }
    }
}

/// Run one effect to completion
pub async fn perform(effect: Effect, capabilities: Capabilities) -> Outcome {
    debug!(?effect, "Performing effect");
    match effect {
        Effect::RequestCameraPermission => {
            Outcome::CameraPermission(capabilities.camera.request_permission().await)
        }
        Effect::RequestMediaPermission => {
            Outcome::MediaPermission(capabilities.library.request_write_permission().await)
        }
        Effect::Capture(request) => {
            Outcome::Captured(capabilities.camera.capture_still(request).await)
        }
        Effect::Save(image) => {
            let result = capabilities.library.write_asset(&image).await;
            Outcome::Saved { image, result }
        }
        Effect::Discard(image) => {
            capabilities.camera.discard(&image).await;
            Outcome::Discarded
        }
    }
}

/// Execute effects one after another, including any follow-ups, until none
/// are left
///
/// Used where there is no UI event loop (command line, tests).
pub async fn run_to_idle(
    screen: &mut CameraScreen,
    effects: impl IntoIterator<Item = Effect>,
    capabilities: &Capabilities,
) {
    let mut queue: VecDeque<Effect> = effects.into_iter().collect();
    while let Some(effect) = queue.pop_front() {
        let outcome = perform(effect, capabilities.clone()).await;
        queue.extend(screen.apply(outcome));
    }
}
