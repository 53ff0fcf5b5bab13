// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use inspo_cam::constants::{QualityPreset, overlay};

const PRESETS: [QualityPreset; 4] = [
    QualityPreset::Low,
    QualityPreset::Medium,
    QualityPreset::High,
    QualityPreset::Maximum,
];

#[test]
fn test_quality_preset_default() {
    assert_eq!(QualityPreset::default(), QualityPreset::High);
}

#[test]
fn test_quality_preset_ordering() {
    // Test that presets are ordered from lowest to highest quality
    let mut prev_quality = 0u8;
    for preset in PRESETS {
        let quality = preset.jpeg_quality();
        assert!(
            quality > prev_quality,
            "Presets should be ordered from lowest to highest"
        );
        assert!(quality <= 100);
        prev_quality = quality;
    }
}

#[test]
fn test_quality_preset_display_names() {
    // Test that all presets have non-empty display names
    for preset in PRESETS {
        assert!(!preset.display_name().is_empty());
    }
}

#[test]
fn test_overlay_defaults() {
    assert_eq!(overlay::DEFAULT_OPACITY, 0.35);
    assert!(overlay::OPACITY_STEP > 0.0);
    assert!(overlay::MIN_OPACITY < overlay::MAX_OPACITY);
}
