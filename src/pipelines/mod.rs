// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines for captured media
//!
//! - [`photo`]: JPEG encoding of still captures
//!
//! The live preview pipeline itself lives in [`crate::backends::camera`].

pub mod photo;
