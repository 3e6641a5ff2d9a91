//! Animated ocean surface: the water plane, its material, the reflection
//! camera and the frame-locked water clock.

pub mod material;
pub mod reflection;

use bevy::{
    asset::embedded_asset,
    image::{ImageAddressMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor},
    prelude::*,
    render::view::RenderLayers,
};
use shared::{
    sets::FrameSet,
    viewport::RenderSurface,
    water::{OceanSettings, WaterClock},
    DataFolderPaths,
};

use crate::{
    constants::OCEAN_RENDER_LAYER,
    remote::{spawn_fetch, PendingFetch},
    AssetSources,
};
use material::{create_ocean_material, OceanMaterial, OceanMaterialHandle};
use reflection::{
    create_reflection_image, mirror_reflection_camera, resize_reflection_target,
    spawn_reflection_camera, ReflectionTarget,
};

pub struct OceanPlugin;

impl Plugin for OceanPlugin {
    fn build(&self, app: &mut App) {
        embedded_asset!(app, "ocean.wgsl");

        app.add_plugins(MaterialPlugin::<OceanMaterial>::default())
            .init_resource::<OceanSettings>()
            .init_resource::<WaterClock>()
            .add_systems(Startup, spawn_ocean)
            .add_systems(Update, poll_water_normals.in_set(FrameSet::Loading))
            .add_systems(
                Update,
                (tick_water_clock, sync_ocean_time)
                    .chain()
                    .in_set(FrameSet::Simulation),
            )
            .add_systems(
                Update,
                (resize_reflection_target, mirror_reflection_camera).in_set(FrameSet::Camera),
            );
    }
}

/// Download of the wave normal map; removed once it resolves.
#[derive(Resource)]
pub struct WaterNormalsFetch(PendingFetch);

fn spawn_ocean(
    mut commands: Commands,
    settings: Res<OceanSettings>,
    surface: Res<RenderSurface>,
    sources: Res<AssetSources>,
    paths: Res<DataFolderPaths>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut images: ResMut<Assets<Image>>,
    mut materials: ResMut<Assets<OceanMaterial>>,
) {
    let reflection_image =
        images.add(create_reflection_image(settings.reflection_extent(surface.aspect_ratio())));
    spawn_reflection_camera(&mut commands, reflection_image.clone());

    let material = materials.add(create_ocean_material(&settings, reflection_image.clone()));
    commands.spawn((
        Name::new("Ocean"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(settings.extent, settings.extent))),
        MeshMaterial3d(material.clone()),
        Transform::default(),
        RenderLayers::layer(OCEAN_RENDER_LAYER),
    ));

    commands.insert_resource(ReflectionTarget {
        image: reflection_image,
    });
    commands.insert_resource(OceanMaterialHandle(material));
    commands.insert_resource(WaterNormalsFetch(spawn_fetch(
        sources.water_normals.clone(),
        paths.remote_cache_path.clone(),
        sources.offline,
    )));
}

/// Hands the downloaded normal map to the ocean material, with repeat addressing so it tiles.
fn poll_water_normals(
    mut commands: Commands,
    fetch: Option<ResMut<WaterNormalsFetch>>,
    asset_server: Res<AssetServer>,
    ocean: Option<Res<OceanMaterialHandle>>,
    mut materials: ResMut<Assets<OceanMaterial>>,
) {
    let (Some(mut fetch), Some(ocean)) = (fetch, ocean) else {
        return;
    };
    let Some(result) = fetch.0.poll() else {
        return;
    };
    commands.remove_resource::<WaterNormalsFetch>();

    match result {
        Ok(asset_path) => {
            let normals: Handle<Image> = asset_server.load_with_settings(
                asset_path,
                |settings: &mut ImageLoaderSettings| {
                    settings.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
                        address_mode_u: ImageAddressMode::Repeat,
                        address_mode_v: ImageAddressMode::Repeat,
                        ..ImageSamplerDescriptor::linear()
                    });
                },
            );
            if let Some(material) = materials.get_mut(&ocean.0) {
                material.extension.normals = Some(normals);
            }
        }
        Err(e) => warn!("Water normals unavailable, the ocean will look flat: {}", e),
    }
}

/// Advances the water clock by a constant step; animation speed follows the frame rate.
pub fn tick_water_clock(mut clock: ResMut<WaterClock>) {
    clock.advance();
}

fn sync_ocean_time(
    clock: Res<WaterClock>,
    ocean: Option<Res<OceanMaterialHandle>>,
    mut materials: ResMut<Assets<OceanMaterial>>,
) {
    let Some(ocean) = ocean else {
        return;
    };
    if let Some(material) = materials.get_mut(&ocean.0) {
        material.extension.uniform.time = clock.time;
    }
}
