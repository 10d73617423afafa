// SPDX-License-Identifier: GPL-3.0-only

//! Screen controls module
//!
//! This module handles the overlay controls of the camera screen:
//! - Capture button
//! - Flash and lens toggles (live view)
//! - Retake and save buttons (review view)

pub mod capture_button;
pub mod review_buttons;
pub mod top_bar;
