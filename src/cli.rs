// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Normalizing image orientation
//! - Composing a reference image over a frame
//! - Taking photos

use inspo_cam::app::{AppModel, InspirationOverlay, Message, Services};
use inspo_cam::backends::camera::{
    CaptureBackend, VirtualCaptureBackend, select_default_device,
};
use inspo_cam::backends::picker::PathPicker;
use inspo_cam::constants::{get_resolution_label, timing};
use inspo_cam::errors::AppError;
use inspo_cam::media::{Bitmap, OrientationTag, Rotation, decode_image, load_image_file, normalize};
use inspo_cam::pipelines::photo::{EncodingFormat, PhotoEncoder};
use inspo_cam::Config;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// List all available cameras
pub fn list_cameras(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut backend = VirtualCaptureBackend::new(config.virtual_devices.clone());
    let cameras = backend.enumerate_devices();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    let default_id = select_default_device(&cameras).map(|d| d.id.clone());

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        let marker = if Some(&camera.id) == default_id.as_ref() {
            " (default)"
        } else {
            ""
        };
        println!("  [{}] {}{}", index, camera.name, marker);
        println!("      Position: {}, lens: {}", camera.position, camera.lens);

        // Open briefly to report the frame size
        let resolution = backend
            .open(camera)
            .and_then(|()| backend.start_streaming())
            .and_then(|()| backend.latest_frame());
        match resolution {
            Ok(frame) => {
                let label = get_resolution_label(frame.width())
                    .map(|l| format!(" ({})", l))
                    .unwrap_or_default();
                println!("      Resolution: {}x{}{}", frame.width(), frame.height(), label);
            }
            Err(e) => println!("      Unavailable: {}", e),
        }
        backend.close();
        println!();
    }

    Ok(())
}

/// Rotate and/or mirror an image file.
///
/// With no explicit orientation the image's embedded EXIF orientation is
/// applied, which writes it out upright.
pub fn normalize_image(
    input: &Path,
    output: &Path,
    rotate: Option<i32>,
    mirror: bool,
    exif: Option<u16>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(input)?;
    let decoded = decode_image(&bytes)?;

    let tag = match (exif, rotate) {
        (Some(code), _) => OrientationTag::from_exif(code),
        (None, Some(degrees)) => OrientationTag::new(Rotation::from_degrees(degrees), mirror),
        (None, None) if mirror => OrientationTag::mirror(),
        (None, None) => decoded.orientation,
    };

    let result = normalize(Some(&decoded.bitmap), tag)?;
    write_image(&result, output, config)?;

    println!(
        "{}x{} -> {}x{} ({})",
        decoded.bitmap.width(),
        decoded.bitmap.height(),
        result.width(),
        result.height(),
        tag
    );
    println!("Saved: {}", output.display());
    Ok(())
}

/// Draw a reference image over a frame
pub fn compose(
    reference: &Path,
    frame: &Path,
    opacity: Option<f32>,
    mirror: bool,
    output: &Path,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut overlay = InspirationOverlay::with_settings(
        opacity.unwrap_or(config.overlay_opacity),
        mirror || config.mirror_overlay,
    );
    overlay.set_image(load_image_file(reference)?);

    let frame = load_image_file(frame)?;
    let composited = overlay.composite(&frame)?;
    write_image(&composited, output, config)?;

    println!("Saved: {}", output.display());
    Ok(())
}

/// Take a photo using the specified camera
pub fn take_photo(
    mut config: Config,
    camera_index: Option<usize>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = output {
        config.photo_dir = Some(dir);
    }

    let services = Services::from_config(&config, Arc::new(PathPicker::default()));

    if let Some(index) = camera_index {
        let cameras = services.session.devices();
        if cameras.is_empty() {
            return Err("No cameras found".into());
        }
        let camera = cameras.get(index).ok_or_else(|| {
            format!(
                "Camera index {} out of range (0-{})",
                index,
                cameras.len() - 1
            )
        })?;
        println!("Using camera: {}", camera.name);
        config.last_device_id = Some(camera.id.clone());
    } else {
        // Always start from the default device rather than the remembered one
        config.last_device_id = None;
    }

    let mut model = AppModel::new(config, services);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        model.dispatch(Message::Start).await;
        if !model.camera.is_running() {
            return Err(format!("Camera not available ({:?})", model.camera));
        }

        // Wait for frames to stabilize (camera warm-up)
        tokio::time::sleep(timing::WARMUP).await;

        println!(
            "Capturing ({} quality {})...",
            model.config.photo_quality.display_name(),
            model.config.photo_format.extension()
        );
        model.dispatch(Message::Capture).await;
        Ok(())
    })?;

    model.shutdown();

    match (&model.last_saved, &model.last_error) {
        (Some(asset), _) => {
            println!("Photo saved: {}", asset.path.display());
            Ok(())
        }
        (None, Some(e)) => Err(AppError::from(e.clone()).into()),
        (None, None) => Err("Photo was not saved".into()),
    }
}

/// Encode by the output path's extension
fn write_image(
    bitmap: &Bitmap,
    output: &Path,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = output
        .extension()
        .and_then(|e| e.to_str())
        .and_then(EncodingFormat::from_extension)
        .ok_or_else(|| format!("Unsupported output format: {}", output.display()))?;

    let mut encoder = PhotoEncoder::new();
    encoder.set_format(format);
    encoder.set_quality(config.photo_quality);
    let data = encoder.encode_bitmap(bitmap)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("inspo-cam-cli-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Red, green and blue pixels in one row
    fn write_strip(path: &Path) {
        let mut strip = image::RgbaImage::new(3, 1);
        strip.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        strip.put_pixel(1, 0, image::Rgba([0, 255, 0, 255]));
        strip.put_pixel(2, 0, image::Rgba([0, 0, 255, 255]));
        strip.save(path).unwrap();
    }

    #[test]
    fn test_normalize_rotates_counter_clockwise() {
        let dir = temp_dir();
        let (input, output) = (dir.join("strip.png"), dir.join("out/rotated.png"));
        write_strip(&input);

        normalize_image(&input, &output, Some(90), false, None, &Config::default()).unwrap();

        let rotated = load_image_file(&output).unwrap();
        assert_eq!(rotated.dimensions(), (1, 3));
        assert_eq!(rotated.rgba_at(0, 0), [0, 0, 255, 255]);
        assert_eq!(rotated.rgba_at(0, 2), [255, 0, 0, 255]);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_normalize_applies_exif_code() {
        let dir = temp_dir();
        let (input, output) = (dir.join("strip.png"), dir.join("flipped.png"));
        write_strip(&input);

        // Code 3 is a half turn
        normalize_image(&input, &output, None, false, Some(3), &Config::default()).unwrap();

        let flipped = load_image_file(&output).unwrap();
        assert_eq!(flipped.dimensions(), (3, 1));
        assert_eq!(flipped.rgba_at(0, 0), [0, 0, 255, 255]);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_compose_draws_reference() {
        let dir = temp_dir();
        let (reference, frame, output) =
            (dir.join("pose.png"), dir.join("frame.png"), dir.join("composed.png"));
        image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 0, 0, 255]))
            .save(&reference)
            .unwrap();
        image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]))
            .save(&frame)
            .unwrap();

        compose(&reference, &frame, Some(1.0), false, &output, &Config::default()).unwrap();

        let composed = load_image_file(&output).unwrap();
        assert_eq!(composed.dimensions(), (4, 4));
        assert_eq!(composed.rgba_at(1, 1), [200, 0, 0, 255]);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_unknown_output_extension_is_rejected() {
        let dir = temp_dir();
        let input = dir.join("strip.png");
        write_strip(&input);

        let result = normalize_image(
            &input,
            &dir.join("strip.mp4"),
            None,
            true,
            None,
            &Config::default(),
        );
        assert!(result.is_err());

        let _ = std::fs::remove_dir_all(dir);
    }
}
