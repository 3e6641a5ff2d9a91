//! Ocean surface parameters and the frame-locked animation clock.
//!
//! The clock advances by [`WATER_TIME_STEP`] once per rendered frame rather
//! than by measured time, so wave speed follows the display refresh rate.

use bevy::prelude::*;

use crate::constants::{
    hex_color, SUN_COLOR, SUN_POSITION, WATER_COLOR, WATER_DISTORTION_SCALE, WATER_EXTENT,
    WATER_TEXTURE_SIZE, WATER_TIME_STEP,
};

/// Animation time fed to the ocean shader.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct WaterClock {
    pub time: f32,
}

impl WaterClock {
    pub fn advance(&mut self) -> f32 {
        self.time += WATER_TIME_STEP;
        self.time
    }
}

/// Static description of the ocean surface, fixed after startup.
#[derive(Resource, Clone, Debug)]
pub struct OceanSettings {
    /// Side length of the square water plane
    pub extent: f32,
    /// Height in pixels of the reflection render target
    pub reflection_height: u32,
    /// How strongly the normal map bends the reflection
    pub distortion_scale: f32,
    pub water_color: Color,
    pub sun_color: Color,
    /// Normalized direction towards the sun
    pub sun_direction: Vec3,
    /// World-space size of one normal map tile at the finest sampling scale
    pub normal_tile_size: f32,
}

impl Default for OceanSettings {
    fn default() -> Self {
        Self {
            extent: WATER_EXTENT,
            reflection_height: WATER_TEXTURE_SIZE,
            distortion_scale: WATER_DISTORTION_SCALE,
            water_color: hex_color(WATER_COLOR),
            sun_color: hex_color(SUN_COLOR),
            sun_direction: SUN_POSITION.normalize(),
            normal_tile_size: 50.0,
        }
    }
}

impl OceanSettings {
    /// Reflection target size for a screen of the given aspect ratio.
    ///
    /// The reflection camera shares the main camera's framing, so the target
    /// keeps the configured height and follows the screen's width.
    pub fn reflection_extent(&self, aspect_ratio: f32) -> UVec2 {
        let height = self.reflection_height.max(1);
        let width = (height as f32 * aspect_ratio).round().max(1.0) as u32;
        UVec2::new(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advances_by_fixed_step() {
        let mut clock = WaterClock::default();
        for frame in 1..=120 {
            let before = clock.time;
            let after = clock.advance();
            assert!(after > before, "clock must never go backwards");
            assert!((after - before - WATER_TIME_STEP).abs() < 1e-4);
            assert!((after - frame as f32 / 60.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_default_sun_direction_is_normalized() {
        let settings = OceanSettings::default();
        assert!((settings.sun_direction.length() - 1.0).abs() < 1e-6);
        assert!(settings.sun_direction.y > 0.0);
    }

    #[test]
    fn test_reflection_extent_follows_aspect() {
        let settings = OceanSettings::default();
        assert_eq!(settings.reflection_extent(1.0), UVec2::new(512, 512));
        assert_eq!(settings.reflection_extent(4.0 / 3.0), UVec2::new(683, 512));
        assert_eq!(settings.reflection_extent(0.0), UVec2::new(1, 512));
    }
}
