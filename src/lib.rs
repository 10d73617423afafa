// SPDX-License-Identifier: GPL-3.0-only

//! Snapcam - a single-screen camera for the COSMIC desktop
//!
//! Live preview with flash and lens toggles, a capture button, a review view
//! with retake and save-to-gallery, all gated behind camera permission.
//!
//! # Architecture
//!
//! - [`app`]: libcosmic application and the pure camera screen state machine
//! - [`backends`]: Camera (PipeWire/GStreamer, portal) and gallery capabilities
//! - [`pipelines`]: JPEG encoding of still captures
//! - [`flash`]: Flash selection and sysfs LED control
//! - [`config`]: User configuration handling
//! - [`storage`]: Capture cache and gallery locations

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod flash;
pub mod i18n;
pub mod pipelines;
pub mod storage;

// Re-export commonly used types
pub use app::screen::{CameraScreen, CaptureMode, Effect, Notice, Outcome, ScreenView};
pub use app::{AppModel, Message};
pub use backends::camera::Facing;
pub use backends::{ImageRef, PermissionStatus};
pub use config::{AppTheme, Config};
pub use flash::FlashMode;
