// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::capture;
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow system theme (dark or light based on system setting)
    #[default]
    System,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl AppTheme {
    /// Get the COSMIC theme for this app theme preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }
}

/// Persisted settings
///
/// Only preferences live here. Permission state, the captured photo, facing
/// and flash are per-session and reset on every start.
#[derive(Debug, Clone, CosmicConfigEntry, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Quality requested from the camera (0.0 - 1.0)
    pub capture_quality: f32,
    /// Folder below the pictures directory that receives saved photos
    pub gallery_album: String,
    /// Mirror the front camera preview (selfie mode); saved photos are never mirrored
    pub mirror_front_preview: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            capture_quality: capture::DEFAULT_QUALITY,
            gallery_album: crate::constants::APP_DIR_NAME.to_string(),
            mirror_front_preview: true,
        }
    }
}
