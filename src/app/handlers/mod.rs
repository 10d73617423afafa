// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules
//!
//! This module organizes message handlers by functional domain,
//! keeping related functionality together for easier maintenance.

pub mod capture;
pub mod permission;
pub mod review;
pub mod ui;

use crate::app::effects;
use crate::app::screen::{Effect, Outcome};
use crate::app::state::{AppModel, Message};
use crate::constants::flash;
use crate::flash::FlashStrategy;
use cosmic::Task;
use tracing::info;

impl AppModel {
    /// Delay a message by `millis`
    pub(crate) fn delay_task(millis: u64, message: Message) -> Task<cosmic::Action<Message>> {
        Task::perform(
            async move {
                tokio::time::sleep(tokio::time::Duration::from_millis(millis)).await;
                message
            },
            cosmic::Action::App,
        )
    }

    /// Turn screen effects into tasks
    pub(crate) fn run_effects(
        &mut self,
        effects: impl IntoIterator<Item = Effect>,
    ) -> Task<cosmic::Action<Message>> {
        let tasks: Vec<_> = effects
            .into_iter()
            .map(|effect| self.run_effect(effect))
            .collect();
        Task::batch(tasks)
    }

    fn run_effect(&mut self, effect: Effect) -> Task<cosmic::Action<Message>> {
        if let Effect::Capture(request) = &effect
            && self.camera.flash_strategy(request) == FlashStrategy::Screen
            && !self.screen_flash_active
        {
            info!("Screen flash before capture");
            self.screen_flash_active = true;
            return Self::delay_task(
                flash::SCREEN_FLASH_MS,
                Message::ScreenFlashComplete(*request),
            );
        }
        self.perform_effect(effect)
    }

    /// Execute an effect in the background and report its outcome
    pub(crate) fn perform_effect(&self, effect: Effect) -> Task<cosmic::Action<Message>> {
        let capabilities = self.capabilities.clone();
        Task::perform(effects::perform(effect, capabilities), |outcome| {
            cosmic::Action::App(Message::Outcome(outcome))
        })
    }

    pub(crate) fn handle_outcome(&mut self, outcome: Outcome) -> Task<cosmic::Action<Message>> {
        let captured = matches!(outcome, Outcome::Captured(_));
        if captured {
            self.screen_flash_active = false;
        }

        let effects = self.screen.apply(outcome);
        let follow_up = self.run_effects(effects);

        if self.screen.image().is_none() {
            self.review_image = None;
        } else {
            // Frames are not needed while reviewing
            self.current_frame = None;
        }

        if captured {
            Task::batch([follow_up, self.load_review_image()])
        } else {
            follow_up
        }
    }
}
