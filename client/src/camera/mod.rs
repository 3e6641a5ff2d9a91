pub mod orbit;
pub mod resize;

use bevy::{prelude::*, render::view::RenderLayers};
use shared::{
    constants::{CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, CAMERA_START},
    orbit::{OrbitSettings, OrbitState},
    sets::FrameSet,
    viewport::RenderSurface,
};

use crate::constants::OCEAN_RENDER_LAYER;
use orbit::{orbit_damping_system, orbit_input_system, OrbitController};
use resize::resize_system;

/// Marker for the camera the player looks through.
#[derive(Component)]
pub struct MainCamera;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_main_camera)
            .add_systems(
                Update,
                (resize_system, orbit_input_system).in_set(FrameSet::Input),
            )
            .add_systems(Update, orbit_damping_system.in_set(FrameSet::Camera));
    }
}

pub fn main_camera_projection(aspect_ratio: f32) -> Projection {
    Projection::Perspective(PerspectiveProjection {
        fov: CAMERA_FOV_DEGREES.to_radians(),
        aspect_ratio,
        near: CAMERA_NEAR,
        far: CAMERA_FAR,
    })
}

fn spawn_main_camera(mut commands: Commands, surface: Res<RenderSurface>) {
    let orbit = OrbitState::new(CAMERA_START, Vec3::ZERO, OrbitSettings::default());
    commands.spawn((
        Name::new("Main camera"),
        MainCamera,
        Camera3d::default(),
        main_camera_projection(surface.aspect_ratio()),
        Transform::from_translation(orbit.eye()).looking_at(orbit.target, Vec3::Y),
        OrbitController(orbit),
        RenderLayers::from_layers(&[0, OCEAN_RENDER_LAYER]),
    ));
}
