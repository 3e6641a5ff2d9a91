use bevy::{prelude::*, render::view::RenderLayers};
use shared::constants::{hex_color, AMBIENT_COLOR, SUN_COLOR, SUN_POSITION};

use crate::constants::{AMBIENT_BRIGHTNESS, OCEAN_RENDER_LAYER, SUN_ILLUMINANCE};

/// One white sun plus a dim ambient fill, lighting both the scene and the ocean layer.
pub struct LightingPlugin;

impl Plugin for LightingPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
            .insert_resource(AmbientLight {
                color: hex_color(AMBIENT_COLOR),
                brightness: AMBIENT_BRIGHTNESS,
                ..default()
            })
            .add_systems(Startup, spawn_sun);
    }
}

fn spawn_sun(mut commands: Commands) {
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            color: hex_color(SUN_COLOR),
            illuminance: SUN_ILLUMINANCE,
            ..default()
        },
        Transform::from_translation(SUN_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        RenderLayers::from_layers(&[0, OCEAN_RENDER_LAYER]),
    ));
}
