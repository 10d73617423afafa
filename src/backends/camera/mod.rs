// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire camera backend
//!
//! ```text
//! ┌────────────────┐   frames   ┌───────────┐
//! │PreviewPipeline │ ─────────▶ │ FrameSlot │ ◀── PipeWireCamera::capture_still
//! │ (GStreamer)    │ ─┐         └───────────┘
//! └────────────────┘  │ try_send
//!                     ▼
//!                UI preview
//! ```
//!
//! The preview pipeline is owned by whoever shows the preview (the GUI
//! subscription or the CLI). [`PipeWireCamera`] only needs the shared frame
//! slot: a still capture is the first frame published after the request,
//! encoded to JPEG in the capture cache.

pub mod enumeration;
pub mod pipeline;
pub mod types;

pub use enumeration::{enumerate_cameras, is_pipewire_available, select_for_facing};
pub use pipeline::PreviewPipeline;
pub use types::*;

use crate::backends::{CameraCapability, CaptureRequest, ImageRef, PermissionStatus, portal};
use crate::constants::{capture, flash as flash_timing};
use crate::errors::CaptureError;
use crate::flash::{FlashHardware, FlashStrategy};
use crate::pipelines::photo::PhotoEncoder;
use crate::storage;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Camera capability backed by the PipeWire preview pipeline
#[derive(Clone)]
pub struct PipeWireCamera {
    slot: Arc<FrameSlot>,
    remote: Arc<Mutex<Option<OwnedFd>>>,
    flash: Arc<FlashHardware>,
    cache_dir: PathBuf,
    frame_timeout: Duration,
}

impl PipeWireCamera {
    pub fn new(slot: Arc<FrameSlot>, flash: FlashHardware) -> Self {
        Self {
            slot,
            remote: Arc::new(Mutex::new(None)),
            flash: Arc::new(flash),
            cache_dir: storage::capture_cache_dir(),
            frame_timeout: Duration::from_millis(capture::FRAME_TIMEOUT_MS),
        }
    }

    pub fn with_cache_dir(mut self, cache_dir: PathBuf) -> Self {
        self.cache_dir = cache_dir;
        self
    }

    pub fn with_frame_timeout(mut self, timeout: Duration) -> Self {
        self.frame_timeout = timeout;
        self
    }

    /// Slot the preview pipeline should publish into
    pub fn frame_slot(&self) -> Arc<FrameSlot> {
        Arc::clone(&self.slot)
    }

    /// Portal PipeWire connection for the preview, if the portal granted one
    pub fn pipewire_remote_fd(&self) -> Option<RawFd> {
        let remote = self.remote.lock().ok()?;
        remote.as_ref().map(|fd| fd.as_raw_fd())
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Flash strategy for a capture with these settings
    pub fn flash_strategy(&self, request: &CaptureRequest) -> FlashStrategy {
        FlashStrategy::select(request.flash, request.facing, self.flash.has_devices())
    }

    /// Blocking capture: grab a fresh frame, encode it, write it to the cache
    fn capture_blocking(&self, request: CaptureRequest) -> Result<PathBuf, CaptureError> {
        if !self.slot.is_bound() {
            warn!(facing = %request.facing, "No preview pipeline running, nothing to capture");
            return Err(CaptureError::NoCamera);
        }

        let led = self.flash_strategy(&request) == FlashStrategy::Led;
        if led {
            self.flash.all_on();
            std::thread::sleep(Duration::from_millis(flash_timing::LED_LEAD_MS));
        }

        let requested_at = Instant::now();
        let frame = self.slot.wait_newer_than(requested_at, self.frame_timeout);

        if led {
            self.flash.all_off();
        }

        let frame = frame.ok_or(CaptureError::NoFrame)?;
        debug!(
            width = frame.width,
            height = frame.height,
            latency_ms = frame.captured_at.duration_since(requested_at).as_millis() as u64,
            "Got capture frame"
        );

        let encoded = PhotoEncoder::new(request.quality).encode_frame(&frame)?;

        std::fs::create_dir_all(&self.cache_dir)?;
        let path = self.cache_dir.join(format!(
            "{}.{}",
            uuid::Uuid::new_v4(),
            capture::EXTENSION
        ));
        std::fs::write(&path, &encoded.data)?;

        info!(
            path = %path.display(),
            width = encoded.width,
            height = encoded.height,
            facing = %request.facing,
            "Capture written"
        );
        Ok(path)
    }
}

impl CameraCapability for PipeWireCamera {
    fn request_permission(&self) -> BoxFuture<'static, PermissionStatus> {
        let remote = Arc::clone(&self.remote);
        async move {
            let pipewire_available = tokio::task::spawn_blocking(is_pipewire_available)
                .await
                .unwrap_or(false);
            let access = portal::camera_permission(pipewire_available).await;
            if let Some(fd) = access.remote
                && let Ok(mut current) = remote.lock()
            {
                *current = Some(fd);
            }
            access.status
        }
        .boxed()
    }

    fn capture_still(
        &self,
        request: CaptureRequest,
    ) -> BoxFuture<'static, Result<ImageRef, CaptureError>> {
        let camera = self.clone();
        async move {
            let path = tokio::task::spawn_blocking(move || camera.capture_blocking(request))
                .await
                .map_err(|e| CaptureError::Backend(format!("Capture task error: {}", e)))??;
            Ok(ImageRef::from_path(&path))
        }
        .boxed()
    }

    fn discard(&self, image: &ImageRef) -> BoxFuture<'static, ()> {
        let cache_dir = self.cache_dir.clone();
        let path = image.to_path();
        async move {
            let Some(path) = path else {
                debug!("Discarded capture is not a local file, nothing to remove");
                return;
            };
            if !storage::is_inside(&path, &cache_dir) {
                warn!(path = %path.display(), "Refusing to remove file outside the capture cache");
                return;
            }
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "Removed capture"),
                Err(e) => error!(path = %path.display(), error = %e, "Failed to remove capture"),
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flash::FlashMode;

    fn camera() -> PipeWireCamera {
        let cache = std::env::temp_dir().join(format!("snapcam-cache-{}", uuid::Uuid::new_v4()));
        PipeWireCamera::new(FrameSlot::new(), FlashHardware::default())
            .with_cache_dir(cache)
            .with_frame_timeout(Duration::from_millis(500))
    }

    fn request() -> CaptureRequest {
        CaptureRequest {
            facing: Facing::Back,
            flash: FlashMode::Off,
            quality: 1.0,
        }
    }

    fn publish_later(slot: Arc<FrameSlot>) -> std::thread::JoinHandle<()> {
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            slot.publish(Arc::new(CameraFrame {
                width: 4,
                height: 4,
                data: Arc::from(vec![200u8; 4 * 4 * 4]),
                mirrored: false,
                captured_at: Instant::now(),
            }));
        })
    }

    #[test]
    fn test_capture_writes_jpeg_into_cache() {
        let camera = camera();
        let _preview = camera.frame_slot().bind();
        let publisher = publish_later(camera.frame_slot());
        let path = camera.capture_blocking(request()).unwrap();
        publisher.join().unwrap();

        assert!(path.starts_with(camera.cache_dir()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jpg"));
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        std::fs::remove_dir_all(camera.cache_dir()).ok();
    }

    #[test]
    fn test_capture_without_frames_fails() {
        let camera = camera().with_frame_timeout(Duration::from_millis(20));
        let _preview = camera.frame_slot().bind();
        assert_eq!(camera.capture_blocking(request()), Err(CaptureError::NoFrame));
    }

    #[test]
    fn test_capture_without_preview_fails_fast() {
        let camera = camera().with_frame_timeout(Duration::from_secs(30));
        let started = Instant::now();
        assert_eq!(camera.capture_blocking(request()), Err(CaptureError::NoCamera));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_no_portal_remote_by_default() {
        assert_eq!(camera().pipewire_remote_fd(), None);
    }

    #[test]
    fn test_no_led_means_screen_flash() {
        let camera = camera();
        let mut req = request();
        req.flash = FlashMode::On;
        assert_eq!(camera.flash_strategy(&req), FlashStrategy::Screen);
    }

    #[tokio::test]
    async fn test_discard_only_touches_cache() {
        let camera = camera();
        std::fs::create_dir_all(camera.cache_dir()).unwrap();
        let inside = camera.cache_dir().join("x.jpg");
        std::fs::write(&inside, b"x").unwrap();
        let outside = std::env::temp_dir().join(format!("snapcam-keep-{}.jpg", uuid::Uuid::new_v4()));
        std::fs::write(&outside, b"x").unwrap();

        camera.discard(&ImageRef::from_path(&inside)).await;
        camera.discard(&ImageRef::from_path(&outside)).await;

        assert!(!inside.exists());
        assert!(outside.exists());
        std::fs::remove_file(outside).ok();
        std::fs::remove_dir_all(camera.cache_dir()).ok();
    }
}
