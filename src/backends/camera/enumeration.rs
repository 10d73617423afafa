// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire camera enumeration and facing assignment
//!
//! Cameras are discovered by parsing `pw-cli ls Node`. Lens location is not
//! part of that listing, so every video source is queried once more with
//! `pw-cli info <id>` for `api.libcamera.location`.

use super::types::{CameraDevice, Facing};
use tracing::{debug, info, warn};

/// A `Video/Source` node found in `pw-cli ls Node` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PwNode {
    pub id: String,
    pub serial: Option<String>,
    pub description: String,
}

impl PwNode {
    /// pipewiresrc target for this node (serial preferred over node id)
    pub fn target_path(&self) -> String {
        match &self.serial {
            Some(serial) => format!("pipewire-serial-{}", serial),
            None => format!("pipewire-{}", self.id),
        }
    }
}

/// Enumerate PipeWire cameras
///
/// Returns an empty list when GStreamer or `pipewiresrc` is unavailable. When
/// pipewiresrc exists but pw-cli finds nothing, a single "default" camera is
/// returned so PipeWire can auto-select.
pub fn enumerate_cameras() -> Vec<CameraDevice> {
    if !is_pipewire_available() {
        warn!("pipewiresrc not available - no cameras");
        return Vec::new();
    }

    let Some(stdout) = run_pw_cli(&["ls", "Node"]) else {
        info!("pw-cli unavailable, using PipeWire auto-selection");
        return vec![CameraDevice::pipewire_default()];
    };

    let nodes = parse_pw_cli_nodes(&stdout);
    if nodes.is_empty() {
        info!("No video sources listed by pw-cli, using PipeWire auto-selection");
        return vec![CameraDevice::pipewire_default()];
    }

    let cameras: Vec<CameraDevice> = nodes
        .into_iter()
        .map(|node| {
            let location = run_pw_cli(&["info", &node.id])
                .as_deref()
                .and_then(parse_location);
            debug!(id = %node.id, name = %node.description, ?location, "Found video camera");
            CameraDevice {
                name: node.description.clone(),
                path: node.target_path(),
                location,
            }
        })
        .collect();

    info!(count = cameras.len(), "Enumerated cameras via pw-cli");
    cameras
}

/// Check that GStreamer initialises and provides pipewiresrc
pub fn is_pipewire_available() -> bool {
    if gstreamer::init().is_err() {
        return false;
    }
    gstreamer::ElementFactory::find("pipewiresrc").is_some()
}

fn run_pw_cli(args: &[&str]) -> Option<String> {
    let output = std::process::Command::new("pw-cli")
        .args(args)
        .output()
        .ok()?;

    if !output.status.success() {
        debug!(?args, "pw-cli command failed");
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse `pw-cli ls Node` output into video source nodes
pub fn parse_pw_cli_nodes(stdout: &str) -> Vec<PwNode> {
    #[derive(Default)]
    struct Pending {
        id: Option<String>,
        serial: Option<String>,
        description: Option<String>,
        is_video_source: bool,
    }

    impl Pending {
        fn finish(self, nodes: &mut Vec<PwNode>) {
            if !self.is_video_source {
                return;
            }
            if let (Some(id), Some(description)) = (self.id, self.description) {
                nodes.push(PwNode {
                    id,
                    serial: self.serial,
                    description,
                });
            }
        }
    }

    let mut nodes = Vec::new();
    let mut current = Pending::default();

    for line in stdout.lines() {
        let trimmed = line.trim();

        // "id 76, type PipeWire:Interface:Node/3"
        if trimmed.starts_with("id ") && trimmed.contains("type PipeWire:Interface:Node") {
            std::mem::take(&mut current).finish(&mut nodes);
            current.id = trimmed
                .strip_prefix("id ")
                .and_then(|rest| rest.split(',').next())
                .map(|id| id.trim().to_string());
            continue;
        }

        if trimmed.contains("media.class") && trimmed.contains("\"Video/Source\"") {
            current.is_video_source = true;
        } else if trimmed.contains("object.serial") {
            current.serial = extract_quoted_value(trimmed);
        } else if trimmed.contains("node.description") {
            current.description = extract_quoted_value(trimmed);
        }
    }
    current.finish(&mut nodes);

    nodes
}

/// Find `api.libcamera.location = "front"` in `pw-cli info` output
pub fn parse_location(info: &str) -> Option<Facing> {
    info.lines()
        .map(str::trim)
        .filter(|line| line.contains("api.libcamera.location"))
        .find_map(|line| extract_quoted_value(line).and_then(|v| Facing::from_location(&v)))
}

/// Pick the camera for a facing
///
/// A camera whose reported location matches wins. Without location metadata
/// the first camera is the back camera and the second the front camera. With
/// a single camera both facings use it.
pub fn select_for_facing(cameras: &[CameraDevice], facing: Facing) -> Option<&CameraDevice> {
    if let Some(camera) = cameras.iter().find(|c| c.location == Some(facing)) {
        return Some(camera);
    }

    let unlocated: Vec<&CameraDevice> = cameras.iter().filter(|c| c.location.is_none()).collect();
    let positional = match facing {
        Facing::Back => unlocated.first().copied(),
        Facing::Front => unlocated.get(1).copied(),
    };

    positional.or_else(|| cameras.first())
}

/// Extract quoted value from a property line (`property = "value"` -> `value`)
fn extract_quoted_value(line: &str) -> Option<String> {
    let start = line.find('"')?;
    let end = line[start + 1..].find('"')?;
    Some(line[start + 1..start + 1 + end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PW_CLI_LS: &str = r#"
	id 31, type PipeWire:Interface:Node/3
 		object.serial = "31"
 		node.description = "Dummy-Driver"
 		node.name = "Dummy-Driver"
	id 76, type PipeWire:Interface:Node/3
 		object.serial = "2146"
 		object.path = "v4l2:/dev/video0"
 		node.description = "Integrated Camera (V4L2)"
 		media.class = "Video/Source"
	id 80, type PipeWire:Interface:Node/3
 		node.description = "Front Sensor"
 		media.class = "Video/Source"
"#;

    fn camera(name: &str, location: Option<Facing>) -> CameraDevice {
        CameraDevice {
            name: name.to_string(),
            path: format!("pipewire-{}", name),
            location,
        }
    }

    #[test]
    fn test_parse_only_video_sources() {
        let nodes = parse_pw_cli_nodes(PW_CLI_LS);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].description, "Integrated Camera (V4L2)");
        assert_eq!(nodes[0].target_path(), "pipewire-serial-2146");
        assert_eq!(nodes[1].id, "80");
        assert_eq!(nodes[1].target_path(), "pipewire-80");
    }

    #[test]
    fn test_parse_location() {
        let info = "  properties:\n\t\tapi.libcamera.location = \"front\"\n";
        assert_eq!(parse_location(info), Some(Facing::Front));
        assert_eq!(parse_location("node.name = \"x\""), None);
    }

    #[test]
    fn test_select_prefers_reported_location() {
        let cameras = vec![
            camera("a", Some(Facing::Front)),
            camera("b", Some(Facing::Back)),
        ];
        assert_eq!(select_for_facing(&cameras, Facing::Back).unwrap().name, "b");
        assert_eq!(select_for_facing(&cameras, Facing::Front).unwrap().name, "a");
    }

    #[test]
    fn test_select_positional_without_location() {
        let cameras = vec![camera("first", None), camera("second", None)];
        assert_eq!(
            select_for_facing(&cameras, Facing::Back).unwrap().name,
            "first"
        );
        assert_eq!(
            select_for_facing(&cameras, Facing::Front).unwrap().name,
            "second"
        );
    }

    #[test]
    fn test_single_camera_serves_both_facings() {
        let cameras = vec![camera("only", None)];
        assert_eq!(select_for_facing(&cameras, Facing::Front).unwrap().name, "only");
        assert_eq!(select_for_facing(&cameras, Facing::Back).unwrap().name, "only");
        assert!(select_for_facing(&[], Facing::Back).is_none());
    }
}
