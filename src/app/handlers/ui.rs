// SPDX-License-Identifier: GPL-3.0-only

//! UI Navigation handlers
//!
//! Handles context pages, external links, notices and configuration updates.

use crate::app::state::{AppModel, ContextPage, Message};
use crate::config::Config;
use cosmic::Task;
use tracing::{error, info};

impl AppModel {
    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    pub(crate) fn handle_dismiss_notice(&mut self) -> Task<cosmic::Action<Message>> {
        if let Some(notice) = self.screen.dismiss_notice() {
            info!(?notice, "Notice dismissed");
        }
        Task::none()
    }

    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        info!(?config, "Configuration updated");
        self.screen.set_quality(config.capture_quality);
        let theme_changed = self.config.app_theme != config.app_theme;
        self.config = config;
        if theme_changed {
            return cosmic::command::set_theme(self.config.app_theme.theme());
        }
        Task::none()
    }
}
