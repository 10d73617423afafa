// SPDX-License-Identifier: GPL-3.0-only

//! Storage locations and file helpers for captures and the gallery

use crate::constants::{APP_DIR_NAME, capture};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Gallery folder for an album name (`$XDG_PICTURES_DIR/<album>`)
///
/// Falls back to `~/Pictures` when no pictures directory is configured. The
/// album must be a single folder name; anything that could leave the
/// pictures directory is replaced by the default album.
pub fn gallery_dir(album: &str) -> PathBuf {
    let pictures = dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."));

    let album = album.trim();
    if album.is_empty() {
        return pictures;
    }
    if !is_plain_folder_name(album) {
        warn!(album, "Invalid gallery album, using the default");
        return pictures.join(APP_DIR_NAME);
    }
    pictures.join(album)
}

/// A single normal path component without separators
fn is_plain_folder_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// Directory where unsaved captures live (`$XDG_CACHE_HOME/snapcam/captures`)
pub fn capture_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
        .join(capture::CACHE_SUBDIR)
}

/// `IMG_<YYYYmmdd_HHMMSS>` for the given local time
pub fn gallery_file_stem(now: chrono::DateTime<chrono::Local>) -> String {
    format!("{}_{}", capture::FILE_PREFIX, now.format("%Y%m%d_%H%M%S"))
}

/// First free `<stem>.jpg`, `<stem>_1.jpg`, `<stem>_2.jpg`, ... in `dir`
pub fn unique_gallery_path(dir: &Path, stem: &str) -> PathBuf {
    let first = dir.join(format!("{}.{}", stem, capture::EXTENSION));
    if !first.exists() {
        return first;
    }

    (1u32..)
        .map(|n| dir.join(format!("{}_{}.{}", stem, n, capture::EXTENSION)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

/// Whether `path` lies inside `dir`
pub fn is_inside(path: &Path, dir: &Path) -> bool {
    match (path.canonicalize(), dir.canonicalize()) {
        (Ok(path), Ok(dir)) => path.starts_with(dir),
        _ => path.starts_with(dir),
    }
}

/// Load a captured photo for the review view
///
/// Returns `None` when the file cannot be read.
pub async fn load_review_image(path: PathBuf) -> Option<cosmic::widget::image::Handle> {
    debug!(path = %path.display(), "Loading review image");

    match tokio::fs::read(&path).await {
        Ok(bytes) => Some(cosmic::widget::image::Handle::from_bytes(bytes)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot read review image");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("snapcam-storage-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_file_stem_format() {
        use chrono::TimeZone;
        let now = chrono::Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(gallery_file_stem(now), "IMG_20240309_070501");
    }

    #[test]
    fn test_unique_path_appends_counter_on_collision() {
        let dir = temp_dir();
        let stem = "IMG_20240101_120000";

        let first = unique_gallery_path(&dir, stem);
        assert_eq!(first, dir.join("IMG_20240101_120000.jpg"));
        std::fs::write(&first, b"x").unwrap();

        let second = unique_gallery_path(&dir, stem);
        assert_eq!(second, dir.join("IMG_20240101_120000_1.jpg"));
        std::fs::write(&second, b"x").unwrap();

        assert_eq!(
            unique_gallery_path(&dir, stem),
            dir.join("IMG_20240101_120000_2.jpg")
        );
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_gallery_dir_uses_album() {
        assert!(gallery_dir("snapcam").ends_with("snapcam"));
        assert_eq!(gallery_dir("  "), gallery_dir(""));
    }

    #[test]
    fn test_gallery_dir_stays_inside_pictures() {
        let pictures = gallery_dir("");
        for album in ["../..", "..", "/etc", "a/b", "a\\b", "./x", "."] {
            let dir = gallery_dir(album);
            assert_eq!(
                dir,
                pictures.join(APP_DIR_NAME),
                "album {:?} must fall back to the default",
                album
            );
        }
        assert_eq!(gallery_dir("Holidays"), pictures.join("Holidays"));
    }

    #[tokio::test]
    async fn test_review_image_reads_without_decoding() {
        let dir = temp_dir();
        let file = dir.join("not-a-jpeg.jpg");
        std::fs::write(&file, b"not image data").unwrap();
        assert!(load_review_image(file).await.is_some());
        assert!(load_review_image(dir.join("missing.jpg")).await.is_none());
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_is_inside() {
        let dir = temp_dir();
        let file = dir.join("a.jpg");
        std::fs::write(&file, b"x").unwrap();
        assert!(is_inside(&file, &dir));
        assert!(!is_inside(Path::new("/etc/passwd"), &dir));
        std::fs::remove_dir_all(dir).ok();
    }
}
