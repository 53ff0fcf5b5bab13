// SPDX-License-Identifier: MPL-2.0

//! Storage utilities for the photo folder

use crate::constants::{file_formats, library};
use std::path::PathBuf;
use tracing::debug;

/// `<Pictures>/inspo-cam`, falling back to `~/Pictures/inspo-cam`
pub fn default_photo_directory() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(library::ALBUM_NAME)
}

/// Most recently modified image in `photos_dir`
pub async fn latest_photo(photos_dir: PathBuf) -> Option<PathBuf> {
    let mut entries = tokio::task::spawn_blocking(move || {
        let mut files = Vec::new();
        if let Ok(entries) = std::fs::read_dir(&photos_dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                let is_image = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(file_formats::is_image_extension);
                if is_image {
                    files.push(entry);
                }
            }
        }
        files
    })
    .await
    .ok()?;

    // Newest first
    entries.sort_by_key(|e| {
        e.metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .map(std::cmp::Reverse)
    });

    let latest = entries.first()?.path();
    debug!(path = %latest.display(), "Found latest photo");
    Some(latest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_latest_photo_skips_other_files() {
        let dir = std::env::temp_dir().join(format!("inspo-cam-storage-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("notes.txt"), b"x").unwrap();
        assert_eq!(latest_photo(dir.clone()).await, None);

        std::fs::write(dir.join("IMG_1.jpg"), b"x").unwrap();
        assert_eq!(latest_photo(dir.clone()).await, Some(dir.join("IMG_1.jpg")));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_missing_directory_has_no_photo() {
        assert_eq!(latest_photo(PathBuf::from("/nonexistent/inspo-cam")).await, None);
    }
}
