// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for the camera backend

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Which physical lens is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    /// User-facing lens
    Front,
    /// World-facing lens
    #[default]
    Back,
}

impl Facing {
    /// Flip Front <-> Back
    pub fn toggled(self) -> Self {
        match self {
            Facing::Front => Facing::Back,
            Facing::Back => Facing::Front,
        }
    }

    /// Parse a libcamera location property ("front", "back", "external")
    pub fn from_location(location: &str) -> Option<Self> {
        match location.trim().to_ascii_lowercase().as_str() {
            "front" => Some(Facing::Front),
            "back" | "rear" => Some(Facing::Back),
            _ => None,
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Facing::Front => write!(f, "front"),
            Facing::Back => write!(f, "back"),
        }
    }
}

/// A camera node exposed by PipeWire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Human readable name (node.description)
    pub name: String,
    /// pipewiresrc target, e.g. `pipewire-serial-2146`; empty = let PipeWire choose
    pub path: String,
    /// Lens location reported by libcamera, if any
    pub location: Option<Facing>,
}

impl CameraDevice {
    /// Placeholder used when enumeration finds nothing but pipewiresrc exists
    pub fn pipewire_default() -> Self {
        Self {
            name: "Default Camera (PipeWire)".to_string(),
            path: String::new(),
            location: None,
        }
    }
}

/// An RGBA preview frame
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA pixels (stride == width * 4)
    pub data: Arc<[u8]>,
    /// Whether the pipeline mirrored this frame horizontally
    pub mirrored: bool,
    /// When the frame left the pipeline
    pub captured_at: Instant,
}

/// Latest-frame slot shared between the preview pipeline and still capture
///
/// The streaming thread publishes every frame; capture blocks until a frame
/// newer than the capture request shows up.
#[derive(Debug, Default)]
pub struct FrameSlot {
    latest: Mutex<Option<Arc<CameraFrame>>>,
    fresh: Condvar,
    bindings: AtomicUsize,
}

/// Marks a running producer on a [`FrameSlot`]; released on drop
#[derive(Debug)]
pub struct SlotBinding {
    slot: Arc<FrameSlot>,
}

impl Drop for SlotBinding {
    fn drop(&mut self) {
        self.slot.bindings.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FrameSlot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn publish(&self, frame: Arc<CameraFrame>) {
        if let Ok(mut latest) = self.latest.lock() {
            *latest = Some(frame);
            self.fresh.notify_all();
        }
    }

    /// Register a frame producer (preview pipeline) for this slot
    pub fn bind(self: &Arc<Self>) -> SlotBinding {
        self.bindings.fetch_add(1, Ordering::SeqCst);
        SlotBinding {
            slot: Arc::clone(self),
        }
    }

    /// Whether any preview pipeline currently feeds this slot
    pub fn is_bound(&self) -> bool {
        self.bindings.load(Ordering::SeqCst) > 0
    }

    /// Forget the last frame (pipeline stopped)
    pub fn clear(&self) {
        if let Ok(mut latest) = self.latest.lock() {
            *latest = None;
        }
    }

    /// Wait for a frame captured at or after `since`
    pub fn wait_newer_than(&self, since: Instant, timeout: Duration) -> Option<Arc<CameraFrame>> {
        let deadline = Instant::now() + timeout;
        let mut latest = self.latest.lock().ok()?;

        loop {
            if let Some(frame) = latest.as_ref()
                && frame.captured_at >= since
            {
                return Some(Arc::clone(frame));
            }

            let remaining = deadline.checked_duration_since(Instant::now())?;
            let (guard, result) = self.fresh.wait_timeout(latest, remaining).ok()?;
            latest = guard;
            if result.timed_out() {
                return latest
                    .as_ref()
                    .filter(|frame| frame.captured_at >= since)
                    .cloned();
            }
        }
    }
}

/// Frame sender type for preview streams
pub type FrameSender = futures::channel::mpsc::Sender<Arc<CameraFrame>>;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Camera backend errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// GStreamer or pipewiresrc missing
    NotAvailable(String),
    /// Pipeline construction or start failed
    InitializationFailed(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_at(captured_at: Instant) -> Arc<CameraFrame> {
        Arc::new(CameraFrame {
            width: 2,
            height: 1,
            data: Arc::from(vec![0u8; 8]),
            mirrored: false,
            captured_at,
        })
    }

    #[test]
    fn test_facing_defaults_to_back_and_toggles() {
        assert_eq!(Facing::default(), Facing::Back);
        assert_eq!(Facing::Back.toggled(), Facing::Front);
        assert_eq!(Facing::Front.toggled(), Facing::Back);
    }

    #[test]
    fn test_facing_from_location() {
        assert_eq!(Facing::from_location("front"), Some(Facing::Front));
        assert_eq!(Facing::from_location(" Back "), Some(Facing::Back));
        assert_eq!(Facing::from_location("external"), None);
    }

    #[test]
    fn test_slot_returns_frame_newer_than_request() {
        let slot = FrameSlot::new();
        let since = Instant::now();
        slot.publish(frame_at(Instant::now()));
        let frame = slot.wait_newer_than(since, Duration::from_millis(10));
        assert!(frame.is_some());
    }

    #[test]
    fn test_slot_times_out_on_stale_frame() {
        let slot = FrameSlot::new();
        slot.publish(frame_at(Instant::now()));
        let since = Instant::now() + Duration::from_secs(60);
        assert!(slot.wait_newer_than(since, Duration::from_millis(20)).is_none());
    }

    #[test]
    fn test_slot_wakes_on_publish_from_other_thread() {
        let slot = FrameSlot::new();
        let since = Instant::now();
        let publisher = Arc::clone(&slot);
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            publisher.publish(frame_at(Instant::now()));
        });
        let frame = slot.wait_newer_than(since, Duration::from_secs(2));
        handle.join().unwrap();
        assert!(frame.is_some());
    }

    #[test]
    fn test_slot_binding_released_on_drop() {
        let slot = FrameSlot::new();
        assert!(!slot.is_bound());
        let first = slot.bind();
        let second = slot.bind();
        drop(first);
        assert!(slot.is_bound());
        drop(second);
        assert!(!slot.is_bound());
    }
}
