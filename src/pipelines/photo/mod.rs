// SPDX-License-Identifier: GPL-3.0-only

//! Still photo pipeline
//!
//! ```text
//! FrameSlot → PhotoEncoder (RGBA → JPEG) → capture cache file
//! ```
//!
//! Frames come from the running preview pipeline, so the preview never pauses
//! for a capture.

pub mod encoding;

pub use encoding::{EncodedImage, PhotoEncoder};
