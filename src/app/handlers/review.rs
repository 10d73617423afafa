// SPDX-License-Identifier: GPL-3.0-only

//! Review view handlers

use crate::app::state::{AppModel, Message, ReviewImage};
use crate::backends::ImageRef;
use cosmic::Task;
use tracing::{debug, warn};

impl AppModel {
    pub(crate) fn handle_retake(&mut self) -> Task<cosmic::Action<Message>> {
        let effect = self.screen.retake();
        if self.screen.image().is_none() {
            self.review_image = None;
        }
        self.run_effects(effect)
    }

    pub(crate) fn handle_save(&mut self) -> Task<cosmic::Action<Message>> {
        let effects = self.screen.save();
        self.run_effects(effects)
    }

    /// Load the photo under review
    pub(crate) fn load_review_image(&self) -> Task<cosmic::Action<Message>> {
        let Some(image) = self.screen.image().cloned() else {
            return Task::none();
        };
        let Some(path) = image.to_path() else {
            debug!(image = %image, "Review image is not a local file");
            return Task::none();
        };

        Task::perform(crate::storage::load_review_image(path), move |loaded| {
            cosmic::Action::App(Message::ReviewImageLoaded(image.clone(), loaded))
        })
    }

    pub(crate) fn handle_review_image_loaded(
        &mut self,
        image: ImageRef,
        loaded: Option<cosmic::widget::image::Handle>,
    ) -> Task<cosmic::Action<Message>> {
        // Retaken or saved in the meantime
        if self.screen.image() != Some(&image) {
            return Task::none();
        }

        match loaded {
            Some(handle) => self.review_image = Some(ReviewImage { image, handle }),
            None => warn!(image = %image, "Failed to load review image"),
        }
        Task::none()
    }
}
