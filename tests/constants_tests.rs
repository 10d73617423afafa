// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use snapcam::constants::{capture, flash, jpeg_quality};

#[test]
fn test_default_quality_is_maximum() {
    assert_eq!(capture::DEFAULT_QUALITY, 1.0);
    assert_eq!(jpeg_quality(capture::DEFAULT_QUALITY), 100);
}

#[test]
fn test_jpeg_quality_is_monotonic() {
    let mut prev = 0u8;
    for step in 0..=20 {
        let quality = jpeg_quality(step as f32 / 20.0);
        assert!(quality >= prev, "JPEG quality should grow with capture quality");
        assert!((1..=100).contains(&quality));
        prev = quality;
    }
}

#[test]
fn test_flash_timing() {
    assert!(flash::SCREEN_FLASH_MS > 0);
    assert!(
        flash::LED_LEAD_MS < capture::FRAME_TIMEOUT_MS,
        "LED warm-up must fit inside the frame timeout"
    );
}
