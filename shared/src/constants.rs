use bevy::prelude::*;
use std::f32::consts::PI;

/// Radians added to / removed from the boat heading per turn key press.
pub const BOAT_TURN_STEP: f32 = 0.1;
/// World units travelled per forward / backward key press.
pub const BOAT_MOVE_STEP: f32 = 0.5;

pub const BOAT_MODEL_SCALE: f32 = 0.5;
pub const BOAT_MODEL_HEIGHT: f32 = 0.1;
pub const BOAT_MODEL_YAW: f32 = PI;

pub const FALLBACK_HULL_SIZE: Vec3 = Vec3 {
    x: 2.0,
    y: 1.0,
    z: 4.0,
};
pub const FALLBACK_HULL_HEIGHT: f32 = 0.5;
pub const FALLBACK_HULL_COLOR: u32 = 0x888888;

/// Water clock increment per rendered frame (the clock is frame-locked, not wall-clock).
pub const WATER_TIME_STEP: f32 = 1.0 / 60.0;

pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_START: Vec3 = Vec3 {
    x: 0.0,
    y: 10.0,
    z: 20.0,
};
pub const ORBIT_DAMPING_FACTOR: f32 = 0.05;

pub const SUN_POSITION: Vec3 = Vec3 {
    x: 0.0,
    y: 10.0,
    z: 5.0,
};
pub const SUN_COLOR: u32 = 0xffffff;
pub const AMBIENT_COLOR: u32 = 0x404040;

pub const WATER_EXTENT: f32 = 10_000.0;
pub const WATER_TEXTURE_SIZE: u32 = 512;
pub const WATER_DISTORTION_SCALE: f32 = 3.7;
pub const WATER_COLOR: u32 = 0x001e0f;

pub const DEFAULT_WINDOW_WIDTH: f32 = 800.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 600.0;

pub const WATER_NORMALS_URL: &str =
    "https://raw.githubusercontent.com/mrdoob/three.js/master/examples/textures/waternormals.jpg";
pub const BOAT_MODEL_URL: &str =
    "https://raw.githubusercontent.com/KhronosGroup/glTF-Sample-Models/master/2.0/Sailboat/glTF/Sailboat.gltf";

/// Converts a packed `0xRRGGBB` value into an sRGB color.
pub fn hex_color(hex: u32) -> Color {
    Color::srgb_u8(
        ((hex >> 16) & 0xff) as u8,
        ((hex >> 8) & 0xff) as u8,
        (hex & 0xff) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_channels() {
        let color = hex_color(0x001e0f).to_srgba();
        assert_eq!(color.red, 0.0);
        assert!((color.green - 30.0 / 255.0).abs() < 1e-6);
        assert!((color.blue - 15.0 / 255.0).abs() < 1e-6);
        assert_eq!(color.alpha, 1.0);
    }
}
