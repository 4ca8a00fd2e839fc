//! Camera framing applied after a mode change.

use serde::{Deserialize, Serialize};

use crate::{CenterCoordinate, MapMode};

/// How the renderer moves the camera to a new framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CameraAnimation {
    /// Zoom out, pan and zoom back in.
    FlyTo,
    /// Smooth pan and zoom.
    EaseTo,
}

/// Target framing for the map camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraPreset {
    /// Where to centre the camera.
    pub center: CenterCoordinate,
    /// Target zoom level.
    pub zoom_level: u8,
    /// Transition style.
    pub animation: CameraAnimation,
    /// Transition length in milliseconds.
    pub animation_duration_ms: u64,
}

impl CameraPreset {
    /// Framing used when a package has just been opened.
    pub const READING_ZOOM: u8 = 10;
    /// Framing used for the streamed world map.
    pub const STREAMING_ZOOM: u8 = 5;

    /// Preset for `mode`, centred on `center`.
    ///
    /// # Examples
    ///
    /// ```
    /// use driftpin_core::{CameraAnimation, CameraPreset, CenterCoordinate, MapMode};
    ///
    /// let preset = CameraPreset::for_mode(MapMode::Reading, CenterCoordinate::default());
    /// assert_eq!(preset.zoom_level, 10);
    /// assert_eq!(preset.animation, CameraAnimation::FlyTo);
    /// ```
    #[must_use]
    pub const fn for_mode(mode: MapMode, center: CenterCoordinate) -> Self {
        match mode {
            MapMode::Reading => Self {
                center,
                zoom_level: Self::READING_ZOOM,
                animation: CameraAnimation::FlyTo,
                animation_duration_ms: 2000,
            },
            MapMode::Streaming => Self {
                center,
                zoom_level: Self::STREAMING_ZOOM,
                animation: CameraAnimation::EaseTo,
                animation_duration_ms: 500,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MapMode::Reading, 10, CameraAnimation::FlyTo, 2000)]
    #[case(MapMode::Streaming, 5, CameraAnimation::EaseTo, 500)]
    fn presets_follow_mode(
        #[case] mode: MapMode,
        #[case] zoom: u8,
        #[case] animation: CameraAnimation,
        #[case] duration: u64,
    ) {
        let center = CenterCoordinate::new(1.0, 2.0);
        let preset = CameraPreset::for_mode(mode, center);
        assert_eq!(preset.center, center);
        assert_eq!(preset.zoom_level, zoom);
        assert_eq!(preset.animation, animation);
        assert_eq!(preset.animation_duration_ms, duration);
    }
}
