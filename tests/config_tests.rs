// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use snapcam::{AppTheme, Config};

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.app_theme, AppTheme::System);
    assert_eq!(
        config.capture_quality, 1.0,
        "Captures should request maximum quality by default"
    );
    assert!(
        config.mirror_front_preview,
        "Front preview should be mirrored by default"
    );
}

#[test]
fn test_config_gallery_album() {
    let config = Config::default();
    assert_eq!(config.gallery_album, "snapcam");
}
