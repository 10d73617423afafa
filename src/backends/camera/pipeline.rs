// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer preview pipeline
//!
//! ```text
//! pipewiresrc → videoconvert → [videoflip] → RGBA appsink
//! ```
//!
//! Every frame is published to the shared [`FrameSlot`] (still capture reads
//! from there) and offered to the UI channel with `try_send`, so a slow UI
//! drops frames instead of stalling the streaming thread.

use super::types::*;
use crate::constants::{pipeline, timing};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::os::fd::RawFd;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

static FRAME_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Build the `gst-launch` description for a camera
///
/// An empty `path` lets PipeWire pick the default camera. `pipewire-serial-N`
/// targets an object serial, `pipewire-N` a node id. `remote_fd` is a
/// PipeWire connection handed out by the camera portal; without it
/// pipewiresrc connects to the session's default remote.
pub fn build_pipeline_description(path: &str, mirror: bool, remote_fd: Option<RawFd>) -> String {
    let mut source = "pipewiresrc".to_string();
    if let Some(fd) = remote_fd {
        source.push_str(&format!(" fd={}", fd));
    }
    if let Some(serial) = path.strip_prefix("pipewire-serial-") {
        source.push_str(&format!(" target-object={}", serial));
    } else if let Some(node_id) = path.strip_prefix("pipewire-") {
        source.push_str(&format!(" path={}", node_id));
    } else if !path.is_empty() {
        source.push_str(&format!(" target-object={}", path));
    }
    source.push_str(" do-timestamp=true");

    let flip = if mirror {
        " ! videoflip method=horizontal-flip"
    } else {
        ""
    };

    format!(
        "{source} ! queue max-size-buffers=2 leaky=downstream ! videoconvert{flip} \
         ! video/x-raw,format=RGBA ! appsink name=sink"
    )
}

/// Copy a possibly padded RGBA plane into a tightly packed buffer
pub fn pack_rgba(data: &[u8], width: u32, height: u32, stride: usize) -> Option<Vec<u8>> {
    let row_bytes = width as usize * 4;
    if stride < row_bytes {
        return None;
    }
    let needed = stride * (height as usize).saturating_sub(1) + row_bytes;
    if data.len() < needed {
        return None;
    }

    if stride == row_bytes {
        return Some(data[..row_bytes * height as usize].to_vec());
    }

    let mut packed = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        packed.extend_from_slice(&data[start..start + row_bytes]);
    }
    Some(packed)
}

/// Running preview pipeline; stops the camera when dropped
pub struct PreviewPipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
    slot: Arc<FrameSlot>,
    _binding: SlotBinding,
}

impl PreviewPipeline {
    pub fn new(
        device: &CameraDevice,
        mirror: bool,
        remote_fd: Option<RawFd>,
        frame_sender: FrameSender,
        slot: Arc<FrameSlot>,
    ) -> BackendResult<Self> {
        info!(
            device = %device.name,
            path = %device.path,
            mirror,
            portal_remote = remote_fd.is_some(),
            "Creating preview pipeline"
        );

        gstreamer::init().map_err(|e| BackendError::NotAvailable(e.to_string()))?;

        let description = build_pipeline_description(&device.path, mirror, remote_fd);
        debug!(pipeline = %description, "Launching pipeline");

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(|_| {
                BackendError::InitializationFailed("Launch result is not a pipeline".to_string())
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| BackendError::InitializationFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| {
                BackendError::InitializationFailed("Failed to cast appsink".to_string())
            })?;

        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        let callback_slot = Arc::clone(&slot);
        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_num = FRAME_COUNTER.fetch_add(1, Ordering::Relaxed);
                    let captured_at = Instant::now();

                    let sample = appsink.pull_sample().map_err(|_| gstreamer::FlowError::Eos)?;
                    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
                    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;

                    let video_info = VideoInfo::from_caps(caps).map_err(|e| {
                        error!(frame = frame_num, error = ?e, "Failed to get video info");
                        gstreamer::FlowError::Error
                    })?;

                    let map = buffer.map_readable().map_err(|e| {
                        error!(frame = frame_num, error = ?e, "Failed to map buffer");
                        gstreamer::FlowError::Error
                    })?;

                    let width = video_info.width();
                    let height = video_info.height();
                    let stride = video_info.stride()[0].max(0) as usize;

                    let Some(pixels) = pack_rgba(map.as_slice(), width, height, stride) else {
                        warn!(frame = frame_num, width, height, stride, "Short RGBA buffer, skipping");
                        return Ok(gstreamer::FlowSuccess::Ok);
                    };

                    let frame = Arc::new(CameraFrame {
                        width,
                        height,
                        data: Arc::from(pixels),
                        mirrored: mirror,
                        captured_at,
                    });

                    callback_slot.publish(Arc::clone(&frame));

                    let mut sender = frame_sender.clone();
                    if let Err(e) = sender.try_send(frame)
                        && frame_num % timing::FRAME_LOG_INTERVAL == 0
                    {
                        debug!(frame = frame_num, error = ?e, "Frame dropped (channel full)");
                    }

                    if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                        debug!(frame = frame_num, width, height, "Preview frame");
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        pipeline.set_state(gstreamer::State::Playing).map_err(|e| {
            BackendError::InitializationFailed(format!("Failed to start pipeline: {}", e))
        })?;

        let (result, state, pending) = pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, pending = ?pending, "Pipeline state");
        if result.is_err() {
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(BackendError::InitializationFailed(
                "Pipeline failed to reach PLAYING".to_string(),
            ));
        }

        info!("Preview pipeline running");
        let binding = slot.bind();
        Ok(Self {
            pipeline,
            appsink,
            slot,
            _binding: binding,
        })
    }

    /// Pop an error message off the bus, if the pipeline reported one
    pub fn poll_error(&self) -> Option<String> {
        let bus = self.pipeline.bus()?;
        while let Some(msg) = bus.pop() {
            if let gstreamer::MessageView::Error(err) = msg.view() {
                return Some(err.error().to_string());
            }
        }
        None
    }
}

impl Drop for PreviewPipeline {
    fn drop(&mut self) {
        info!("Stopping preview pipeline");
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());
        let _ = self.pipeline.set_state(gstreamer::State::Null);
        let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::STOP_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, "Preview pipeline stopped");
        self.slot.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_targets_serial() {
        let desc = build_pipeline_description("pipewire-serial-2146", false, None);
        assert!(desc.starts_with("pipewiresrc target-object=2146"));
        assert!(!desc.contains("videoflip"));
        assert!(desc.ends_with("appsink name=sink"));
    }

    #[test]
    fn test_description_node_id_and_mirror() {
        let desc = build_pipeline_description("pipewire-76", true, None);
        assert!(desc.starts_with("pipewiresrc path=76"));
        assert!(desc.contains("videoflip method=horizontal-flip"));
    }

    #[test]
    fn test_description_default_camera() {
        let desc = build_pipeline_description("", false, None);
        assert!(desc.starts_with("pipewiresrc do-timestamp=true !"));
    }

    #[test]
    fn test_description_uses_portal_remote() {
        let desc = build_pipeline_description("", false, Some(7));
        assert!(desc.starts_with("pipewiresrc fd=7 do-timestamp=true !"));

        let desc = build_pipeline_description("pipewire-serial-9", false, Some(7));
        assert!(desc.starts_with("pipewiresrc fd=7 target-object=9 do-timestamp=true"));
    }

    #[test]
    fn test_pack_rgba_strips_row_padding() {
        // 1x2 image, stride 8 (4 bytes padding per row)
        let data = [1, 2, 3, 4, 0, 0, 0, 0, 5, 6, 7, 8];
        let packed = pack_rgba(&data, 1, 2, 8).unwrap();
        assert_eq!(packed, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_pack_rgba_rejects_short_buffer() {
        assert!(pack_rgba(&[0; 4], 2, 1, 8).is_none());
        assert!(pack_rgba(&[0; 16], 2, 2, 4).is_none());
    }
}
