// SPDX-License-Identifier: MPL-2.0

//! Integration tests for orientation normalization

use inspo_cam::errors::NormalizeError;
use inspo_cam::media::{Bitmap, OrientationTag, PixelLayout, Rotation, normalize};

/// RGBA bitmap where every pixel is distinct
fn numbered(width: u32, height: u32) -> Bitmap {
    let data: Vec<u8> = (0..width * height)
        .flat_map(|i| [(i % 251) as u8, (i / 251 % 251) as u8, (i % 7) as u8, 255])
        .collect();
    Bitmap::from_packed(width, height, PixelLayout::Rgba8, data).unwrap()
}

fn same_pixels(a: &Bitmap, b: &Bitmap) -> bool {
    a.dimensions() == b.dimensions() && a.to_rgba_image() == b.to_rgba_image()
}

#[test]
fn test_identity_returns_identical_pixels() {
    let source = numbered(7, 5);
    let out = normalize(Some(&source), OrientationTag::IDENTITY).unwrap();
    assert!(same_pixels(&source, &out));
    assert_eq!(out.layout(), source.layout());
}

#[test]
fn test_quarter_turns_swap_dimensions() {
    let source = numbered(7, 5);
    for tag in OrientationTag::all() {
        let out = normalize(Some(&source), tag).unwrap();
        let expected = if tag.rotation.swaps_dimensions() {
            (5, 7)
        } else {
            (7, 5)
        };
        assert_eq!(out.dimensions(), expected, "tag {}", tag);
    }
}

#[test]
fn test_half_turn_twice_is_identity() {
    let source = numbered(6, 4);
    let half = OrientationTag::new(Rotation::Rotate180, false);
    let twice = normalize(Some(&normalize(Some(&source), half).unwrap()), half).unwrap();
    assert!(same_pixels(&source, &twice));
}

#[test]
fn test_mirror_twice_is_identity() {
    let source = numbered(6, 4);
    let once = normalize(Some(&source), OrientationTag::mirror()).unwrap();
    assert!(!same_pixels(&source, &once));
    let twice = normalize(Some(&once), OrientationTag::mirror()).unwrap();
    assert!(same_pixels(&source, &twice));
}

#[test]
fn test_quarter_turn_and_inverse() {
    let source = numbered(9, 3);
    let ccw = OrientationTag::new(Rotation::Rotate90, false);
    let cw = OrientationTag::new(Rotation::Rotate270, false);
    let back = normalize(Some(&normalize(Some(&source), ccw).unwrap()), cw).unwrap();
    assert!(same_pixels(&source, &back));
}

#[test]
fn test_absent_source_has_no_result() {
    for tag in OrientationTag::all() {
        assert_eq!(
            normalize(None, tag).unwrap_err(),
            NormalizeError::MissingSource
        );
    }
}

#[test]
fn test_portrait_quarter_turn_moves_origin() {
    // 100x200 with only the top-left pixel lit
    let mut data = vec![0u8; 100 * 200 * 4];
    data[..4].copy_from_slice(&[255, 255, 255, 255]);
    let source = Bitmap::from_packed(100, 200, PixelLayout::Rgba8, data).unwrap();

    let out = normalize(Some(&source), OrientationTag::new(Rotation::Rotate90, false)).unwrap();
    assert_eq!(out.dimensions(), (200, 100));
    assert_eq!(out.rgba_at(0, 99), [255, 255, 255, 255]);

    let lit = out
        .to_rgba_image()
        .pixels()
        .filter(|p| p.0 == [255, 255, 255, 255])
        .count();
    assert_eq!(lit, 1);
}

#[test]
fn test_source_is_not_modified() {
    let source = numbered(4, 4);
    let before = source.to_rgba_image();
    for tag in OrientationTag::all() {
        let _ = normalize(Some(&source), tag).unwrap();
    }
    assert_eq!(source.to_rgba_image(), before);
}

#[test]
fn test_exif_codes_round_trip() {
    for code in 1..=8u16 {
        assert_eq!(OrientationTag::from_exif(code).to_exif(), code);
    }
    assert!(OrientationTag::from_exif(0).is_identity());
    assert!(OrientationTag::from_exif(9).is_identity());
}
