//! Ocean material.
//!
//! Extends Bevy's `StandardMaterial` so the water body picks up the scene's
//! directional and ambient lights, then layers a scrolling normal map, a
//! planar reflection and a sun glint on top in `ocean.wgsl`.

use bevy::{
    asset::Asset,
    pbr::{ExtendedMaterial, MaterialExtension, StandardMaterial},
    prelude::*,
    render::render_resource::{AsBindGroup, ShaderRef, ShaderType},
};
use shared::water::OceanSettings;

pub const OCEAN_SHADER_PATH: &str = "embedded://sailboat/water/ocean.wgsl";

/// Uniform block of the ocean shader (matches WGSL `OceanUniform`).
#[derive(Clone, Copy, Debug, ShaderType)]
pub struct OceanUniform {
    pub water_color: Vec4,
    pub sun_color: Vec4,
    /// Normalized direction towards the sun
    pub sun_direction: Vec3,
    /// Animation time, advanced once per frame
    pub time: f32,
    pub distortion_scale: f32,
    /// World units covered by one tile of the finest normal map layer
    pub tile_size: f32,
}

impl OceanUniform {
    pub fn from_settings(settings: &OceanSettings) -> Self {
        Self {
            water_color: settings.water_color.to_linear().to_vec4(),
            sun_color: settings.sun_color.to_linear().to_vec4(),
            sun_direction: settings.sun_direction,
            time: 0.0,
            distortion_scale: settings.distortion_scale,
            tile_size: settings.normal_tile_size,
        }
    }
}

#[derive(Asset, AsBindGroup, TypePath, Debug, Clone)]
pub struct OceanMaterialExtension {
    #[uniform(100)]
    pub uniform: OceanUniform,

    /// Tangent-space wave normals, sampled with repeat addressing
    #[texture(101)]
    #[sampler(102)]
    pub normals: Option<Handle<Image>>,

    /// Mirror image of the scene rendered by the reflection camera
    #[texture(103)]
    #[sampler(104)]
    pub reflection: Option<Handle<Image>>,
}

impl MaterialExtension for OceanMaterialExtension {
    fn fragment_shader() -> ShaderRef {
        OCEAN_SHADER_PATH.into()
    }
}

pub type OceanMaterial = ExtendedMaterial<StandardMaterial, OceanMaterialExtension>;

pub fn create_ocean_material(
    settings: &OceanSettings,
    reflection: Handle<Image>,
) -> OceanMaterial {
    ExtendedMaterial {
        base: StandardMaterial {
            base_color: settings.water_color,
            perceptual_roughness: 0.15,
            reflectance: 0.2,
            ..default()
        },
        extension: OceanMaterialExtension {
            uniform: OceanUniform::from_settings(settings),
            normals: None,
            reflection: Some(reflection),
        },
    }
}

/// Handle to the one ocean material, so the frame loop can update its clock.
#[derive(Resource)]
pub struct OceanMaterialHandle(pub Handle<OceanMaterial>);
