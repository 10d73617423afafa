// SPDX-License-Identifier: GPL-3.0-only

//! Camera access through the XDG desktop portal
//!
//! `org.freedesktop.portal.Camera.AccessCamera` answers asynchronously through
//! `org.freedesktop.portal.Request::Response` on a request object whose path
//! is derived from our unique bus name and a handle token. The signal is
//! subscribed before the call so a fast reply is not missed.
//!
//! Once granted, `OpenPipeWireRemote` hands out a PipeWire connection that
//! only exposes the permitted cameras; the preview pipeline connects through
//! it inside a sandbox.

use super::PermissionStatus;
use futures::StreamExt;
use std::collections::HashMap;
use std::os::fd::OwnedFd;
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_DEST: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_IFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_IFACE: &str = "org.freedesktop.portal.Request";

/// Map a portal `Response` code to a permission status
///
/// 0 = success, 1 = cancelled by the user, 2 = other failure.
pub fn response_to_status(code: u32) -> PermissionStatus {
    match code {
        0 => PermissionStatus::Granted,
        _ => PermissionStatus::Denied,
    }
}

/// Object path of the request the portal will create for `token`
pub fn request_path(unique_name: &str, token: &str) -> String {
    let sender = unique_name.trim_start_matches(':').replace('.', "_");
    format!("{}/request/{}/{}", PORTAL_PATH, sender, token)
}

/// Ask the portal for camera access
///
/// `Err` means the portal could not be reached at all; callers decide how to
/// treat an unsandboxed session.
pub async fn request_camera_access() -> Result<PermissionStatus, String> {
    let connection = zbus::Connection::session()
        .await
        .map_err(|e| format!("Failed to connect to session D-Bus: {}", e))?;

    let camera = zbus::Proxy::new(&connection, PORTAL_DEST, PORTAL_PATH, CAMERA_IFACE)
        .await
        .map_err(|e| format!("Failed to create camera portal proxy: {}", e))?;

    let present: bool = camera
        .get_property("IsCameraPresent")
        .await
        .map_err(|e| format!("Camera portal unavailable: {}", e))?;
    if !present {
        info!("Camera portal reports no camera present");
        return Ok(PermissionStatus::Denied);
    }

    let unique_name = connection
        .unique_name()
        .map(|name| name.to_string())
        .ok_or_else(|| "Connection has no unique name".to_string())?;
    let token = format!("snapcam_{}", uuid::Uuid::new_v4().simple());
    let path = request_path(&unique_name, &token);

    let request = zbus::Proxy::new(&connection, PORTAL_DEST, path.as_str(), REQUEST_IFACE)
        .await
        .map_err(|e| format!("Failed to create request proxy: {}", e))?;
    let mut responses = request
        .receive_signal("Response")
        .await
        .map_err(|e| format!("Failed to subscribe to portal response: {}", e))?;

    let mut options: HashMap<&str, Value> = HashMap::new();
    options.insert("handle_token", Value::new(token.as_str()));

    let handle: OwnedObjectPath = camera
        .call("AccessCamera", &(options,))
        .await
        .map_err(|e| format!("AccessCamera failed: {}", e))?;
    debug!(handle = %handle, expected = %path, "Camera access requested");

    let message = responses
        .next()
        .await
        .ok_or_else(|| "Portal closed without a response".to_string())?;
    let (code, _results): (u32, HashMap<String, OwnedValue>) = message
        .body()
        .deserialize()
        .map_err(|e| format!("Malformed portal response: {}", e))?;

    let status = response_to_status(code);
    info!(code, ?status, "Camera portal responded");
    Ok(status)
}

/// Outcome of a camera access request
#[derive(Debug)]
pub struct CameraAccess {
    pub status: PermissionStatus,
    /// Portal PipeWire connection, when access came from the portal
    pub remote: Option<OwnedFd>,
}

/// Open the portal's restricted PipeWire connection
pub async fn open_pipewire_remote() -> Result<OwnedFd, String> {
    let connection = zbus::Connection::session()
        .await
        .map_err(|e| format!("Failed to connect to session D-Bus: {}", e))?;

    let camera = zbus::Proxy::new(&connection, PORTAL_DEST, PORTAL_PATH, CAMERA_IFACE)
        .await
        .map_err(|e| format!("Failed to create camera portal proxy: {}", e))?;

    let options: HashMap<&str, Value> = HashMap::new();
    let fd: zbus::zvariant::OwnedFd = camera
        .call("OpenPipeWireRemote", &(options,))
        .await
        .map_err(|e| format!("OpenPipeWireRemote failed: {}", e))?;

    debug!("Opened portal PipeWire remote");
    Ok(fd.into())
}

/// Camera permission with the unsandboxed fallback
///
/// Without a reachable portal the process has direct device access, so it
/// is Granted whenever `pipewire_available` holds and no remote is needed.
pub async fn camera_permission(pipewire_available: bool) -> CameraAccess {
    match request_camera_access().await {
        Ok(PermissionStatus::Granted) => {
            let remote = match open_pipewire_remote().await {
                Ok(fd) => Some(fd),
                Err(e) => {
                    warn!(error = %e, "No portal PipeWire remote, using the default remote");
                    None
                }
            };
            CameraAccess {
                status: PermissionStatus::Granted,
                remote,
            }
        }
        Ok(status) => CameraAccess {
            status,
            remote: None,
        },
        Err(e) => {
            let status = if pipewire_available {
                PermissionStatus::Granted
            } else {
                PermissionStatus::Denied
            };
            warn!(error = %e, ?status, "Camera portal not reachable, using direct access");
            CameraAccess {
                status,
                remote: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_codes() {
        assert_eq!(response_to_status(0), PermissionStatus::Granted);
        assert_eq!(response_to_status(1), PermissionStatus::Denied);
        assert_eq!(response_to_status(2), PermissionStatus::Denied);
    }

    #[test]
    fn test_request_path_from_unique_name() {
        assert_eq!(
            request_path(":1.42", "snapcam_abc"),
            "/org/freedesktop/portal/desktop/request/1_42/snapcam_abc"
        );
    }
}
