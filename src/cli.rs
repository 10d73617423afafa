// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Taking a photo through the same screen state machine the GUI uses

use futures::StreamExt;
use futures::channel::mpsc;
use snapcam::app::effects::{Capabilities, run_to_idle};
use snapcam::backends::camera::{
    CameraDevice, FrameSlot, PipeWireCamera, PreviewPipeline, enumerate_cameras, select_for_facing,
};
use snapcam::backends::gallery::GalleryStore;
use snapcam::config::Config;
use snapcam::constants::{APP_ID, pipeline};
use snapcam::errors::{Capability, ScreenError};
use snapcam::flash::FlashHardware;
use snapcam::{CameraScreen, Facing, Notice};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;

    let cameras = enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    let back = select_for_facing(&cameras, Facing::Back);
    let front = select_for_facing(&cameras, Facing::Front);

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.name);

        let location = camera
            .location
            .map(|facing| facing.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!("      Location: {}", location);

        let mut used_for = Vec::new();
        if back == Some(camera) {
            used_for.push("back");
        }
        if front == Some(camera) {
            used_for.push("front");
        }
        if !used_for.is_empty() {
            println!("      Used for: {}", used_for.join(", "));
        }
        println!();
    }

    Ok(())
}

/// Take a photo with the given lens and save it to the gallery
pub fn take_photo(
    facing: Facing,
    flash: bool,
    quality: f32,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;

    let cameras = enumerate_cameras();
    let device = select_for_facing(&cameras, facing)
        .cloned()
        .ok_or("No cameras found")?;
    println!("Using camera: {}", device.name);

    let config = load_config();
    let library = match output {
        Some(dir) => GalleryStore::new(dir),
        None => GalleryStore::for_album(&config.gallery_album),
    };

    let camera = PipeWireCamera::new(FrameSlot::new(), FlashHardware::detect());
    let capabilities = Capabilities::new(Arc::new(camera.clone()), Arc::new(library));
    let mut screen = CameraScreen::new().with_quality(quality);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(photo_session(
        &mut screen,
        &capabilities,
        &camera,
        &device,
        facing,
        flash,
    ))
}

/// Drive the screen from mount to saved photo
async fn photo_session(
    screen: &mut CameraScreen,
    capabilities: &Capabilities,
    camera: &PipeWireCamera,
    device: &CameraDevice,
    facing: Facing,
    flash: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mount = screen.mount();
    run_to_idle(screen, mount, capabilities).await;
    if !screen.camera_permission().is_granted() {
        return Err(ScreenError::PermissionDenied(Capability::Camera).into());
    }

    // Preview frames feed the capture slot; the CLI never shows them
    let (sender, mut receiver) = mpsc::channel(pipeline::PREVIEW_CHANNEL_CAPACITY);
    let _preview = PreviewPipeline::new(
        device,
        false,
        camera.pipewire_remote_fd(),
        sender,
        camera.frame_slot(),
    )?;

    println!("Waiting for camera...");
    match tokio::time::timeout(Duration::from_secs(5), receiver.next()).await {
        Ok(Some(_)) => {}
        _ => return Err("Camera produced no frames".into()),
    }
    // Give auto exposure a moment to settle
    tokio::time::sleep(Duration::from_millis(500)).await;
    drop(receiver);

    if screen.facing() != facing {
        screen.toggle_facing();
    }
    if screen.flash().is_on() != flash {
        screen.toggle_flash();
    }

    println!("Capturing...");
    let capture = screen.capture().ok_or("Camera is not ready")?;
    run_to_idle(screen, [capture], capabilities).await;

    if let Some(Notice::CaptureFailed(e)) = screen.dismiss_notice() {
        return Err(format!("Capture failed: {}", e).into());
    }
    if screen.image().is_none() {
        return Err("Capture produced no photo".into());
    }

    let save = screen.save();
    run_to_idle(screen, save, capabilities).await;

    match screen.dismiss_notice() {
        Some(Notice::Saved(path)) => {
            println!("Photo saved: {}", path.display());
            Ok(())
        }
        Some(Notice::SaveFailed(e)) => Err(format!("Save failed: {}", e).into()),
        _ => Err("Photo was not saved".into()),
    }
}

fn load_config() -> Config {
    use cosmic::cosmic_config::{self, CosmicConfigEntry};

    match cosmic_config::Config::new(APP_ID, Config::VERSION) {
        Ok(handler) => Config::get_entry(&handler).unwrap_or_else(|(errors, config)| {
            tracing::warn!(?errors, "Errors loading config");
            config
        }),
        Err(err) => {
            tracing::warn!(%err, "Failed to create config handler");
            Config::default()
        }
    }
}
