// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Application ID (RDNN), also the cosmic-config namespace
pub const APP_ID: &str = "io.github.snapcam.Snapcam";

/// Directory name used below the XDG cache and pictures directories
pub const APP_DIR_NAME: &str = "snapcam";

/// Still capture settings
pub mod capture {
    /// Quality requested from the camera capability (0.0 - 1.0, 1.0 = maximum)
    pub const DEFAULT_QUALITY: f32 = 1.0;

    /// How long a capture waits for a fresh preview frame
    pub const FRAME_TIMEOUT_MS: u64 = 3000;

    /// Subdirectory of the cache directory holding unsaved captures
    pub const CACHE_SUBDIR: &str = "captures";

    /// Gallery file name prefix
    pub const FILE_PREFIX: &str = "IMG";

    /// File extension of encoded captures
    pub const EXTENSION: &str = "jpg";
}

/// Flash timing
pub mod flash {
    /// White screen overlay duration before a screen-flash capture
    pub const SCREEN_FLASH_MS: u64 = 600;

    /// LED warm-up before the frame is grabbed
    pub const LED_LEAD_MS: u64 = 250;
}

/// GStreamer preview pipeline
pub mod pipeline {
    /// appsink buffer count (frames are dropped when the UI falls behind)
    pub const MAX_BUFFERS: u32 = 2;

    /// Capacity of the frame channel between the pipeline and the UI
    pub const PREVIEW_CHANNEL_CAPACITY: usize = 4;
}

pub mod timing {
    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 60;

    /// Pipeline state change timeout on start
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// Pipeline state change timeout on stop
    pub const STOP_TIMEOUT_SECS: u64 = 2;

    /// Delay before retrying a preview pipeline that failed to start
    pub const PIPELINE_RETRY_SECS: u64 = 3;
}

pub mod ui {
    /// Capture button size (outer ring)
    pub const CAPTURE_BUTTON_OUTER: f32 = 80.0;

    /// Capture button size (inner disc)
    pub const CAPTURE_BUTTON_INNER: f32 = 60.0;

    /// Capture button ring width
    pub const CAPTURE_BUTTON_BORDER: f32 = 4.0;

    /// Round action buttons in the review view
    pub const REVIEW_BUTTON_SIZE: f32 = 70.0;

    /// Icon size for overlay controls
    pub const CONTROL_ICON_SIZE: u16 = 32;

    /// Icon size on the permission prompt
    pub const PERMISSION_ICON_SIZE: u16 = 48;

    /// Overlay button/container background transparency (0.0 = transparent, 1.0 = opaque)
    pub const OVERLAY_BACKGROUND_ALPHA: f32 = 0.6;

    /// Horizontal padding of the top control row
    pub const TOP_CONTROLS_PADDING: u16 = 30;

    /// Distance of the bottom controls from the window edge
    pub const BOTTOM_CONTROLS_MARGIN: u16 = 40;
}

/// Map a capability quality (0.0 - 1.0) to a JPEG quality value (1 - 100)
///
/// Out-of-range and NaN inputs are clamped; NaN is treated as maximum quality.
pub fn jpeg_quality(quality: f32) -> u8 {
    if quality.is_nan() {
        return 100;
    }
    let scaled = (quality.clamp(0.0, 1.0) * 100.0).round() as u8;
    scaled.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_quality_maps_full_range() {
        assert_eq!(jpeg_quality(1.0), 100);
        assert_eq!(jpeg_quality(0.92), 92);
        assert_eq!(jpeg_quality(0.0), 1);
    }

    #[test]
    fn test_jpeg_quality_clamps() {
        assert_eq!(jpeg_quality(2.5), 100);
        assert_eq!(jpeg_quality(-1.0), 1);
        assert_eq!(jpeg_quality(f32::NAN), 100);
    }
}
