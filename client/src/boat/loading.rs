//! Boat model loading.
//!
//! Loading is one operation with two phases, download then asset load, that
//! resolves to a single [`BoatLoadOutcome`]. A failed outcome spawns a plain
//! box hull instead, so the scene always ends up with exactly one boat.

use bevy::{
    asset::{LoadState, RecursiveDependencyLoadState},
    gltf::Gltf,
    prelude::*,
};
use shared::{
    boat::{Boat, BoatPose},
    constants::{
        hex_color, BOAT_MODEL_HEIGHT, BOAT_MODEL_SCALE, BOAT_MODEL_YAW, FALLBACK_HULL_COLOR,
        FALLBACK_HULL_HEIGHT, FALLBACK_HULL_SIZE,
    },
    DataFolderPaths,
};

use crate::{
    remote::{spawn_fetch, PendingFetch},
    AssetSources,
};

/// Marker for a boat spawned from the glTF model.
#[derive(Component, Debug)]
pub struct BoatModel;

/// Marker for the box spawned when the model could not be loaded.
#[derive(Component, Debug)]
pub struct FallbackHull;

#[derive(Resource)]
pub enum BoatLoad {
    Fetching(PendingFetch),
    Loading(Handle<Gltf>),
    Resolved,
}

impl BoatLoad {
    pub fn is_resolved(&self) -> bool {
        matches!(self, BoatLoad::Resolved)
    }

    /// Download progress, while the model is still being fetched.
    pub fn percent(&self) -> Option<f32> {
        match self {
            BoatLoad::Fetching(fetch) => fetch.progress.percent(),
            _ => None,
        }
    }
}

#[derive(Event, Debug)]
pub enum BoatLoadOutcome {
    Loaded(Handle<Scene>),
    Failed(String),
}

pub fn request_boat_load(
    mut commands: Commands,
    sources: Res<AssetSources>,
    paths: Res<DataFolderPaths>,
) {
    info!("Requesting boat model from {:?}", sources.model);
    let fetch = spawn_fetch(
        sources.model.clone(),
        paths.remote_cache_path.clone(),
        sources.offline,
    );
    commands.insert_resource(BoatLoad::Fetching(fetch));
}

/// Advances the boat load and emits its outcome exactly once.
pub fn poll_boat_load(
    load: Option<ResMut<BoatLoad>>,
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
    mut outcomes: EventWriter<BoatLoadOutcome>,
    mut last_reported: Local<Option<u32>>,
) {
    let Some(mut load) = load else {
        return;
    };

    let next = match &mut *load {
        BoatLoad::Resolved => None,
        BoatLoad::Fetching(fetch) => match fetch.poll() {
            None => {
                if let Some(percent) = fetch.progress.percent() {
                    let whole = percent as u32;
                    if *last_reported != Some(whole) {
                        *last_reported = Some(whole);
                        info!("{}% loaded", whole);
                    }
                }
                None
            }
            Some(Ok(asset_path)) => {
                debug!("Boat model available at {}", asset_path);
                Some(BoatLoad::Loading(asset_server.load::<Gltf>(asset_path)))
            }
            Some(Err(e)) => {
                outcomes.write(BoatLoadOutcome::Failed(e.to_string()));
                Some(BoatLoad::Resolved)
            }
        },
        BoatLoad::Loading(handle) => {
            check_gltf(handle, &asset_server, &gltfs).map(|outcome| {
                outcomes.write(outcome);
                BoatLoad::Resolved
            })
        }
    };

    if let Some(next) = next {
        *load = next;
    }
}

fn check_gltf(
    handle: &Handle<Gltf>,
    asset_server: &AssetServer,
    gltfs: &Assets<Gltf>,
) -> Option<BoatLoadOutcome> {
    if let LoadState::Failed(e) = asset_server.load_state(handle.id()) {
        return Some(BoatLoadOutcome::Failed(e.to_string()));
    }
    if let Some(RecursiveDependencyLoadState::Failed(e)) =
        asset_server.get_recursive_dependency_load_state(handle.id())
    {
        return Some(BoatLoadOutcome::Failed(e.to_string()));
    }
    if !asset_server.is_loaded_with_dependencies(handle.id()) {
        return None;
    }

    let scene = gltfs
        .get(handle)
        .and_then(|gltf| gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned()));
    Some(match scene {
        Some(scene) => BoatLoadOutcome::Loaded(scene),
        None => BoatLoadOutcome::Failed("the glTF file contains no scene".to_string()),
    })
}

pub fn spawn_boat(
    mut commands: Commands,
    mut outcomes: EventReader<BoatLoadOutcome>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for outcome in outcomes.read() {
        match outcome {
            BoatLoadOutcome::Loaded(scene) => {
                let pose = BoatPose::new(Vec3::Y * BOAT_MODEL_HEIGHT, BOAT_MODEL_YAW);
                let mut transform = Transform::from_scale(Vec3::splat(BOAT_MODEL_SCALE));
                pose.write_to(&mut transform);

                commands.spawn((
                    Name::new("Boat"),
                    Boat,
                    BoatModel,
                    pose,
                    SceneRoot(scene.clone()),
                    transform,
                ));
                info!("Boat model loaded");
            }
            BoatLoadOutcome::Failed(reason) => {
                error!("An error happened while loading the boat: {}", reason);

                let pose = BoatPose::new(Vec3::Y * FALLBACK_HULL_HEIGHT, 0.0);
                let mut transform = Transform::default();
                pose.write_to(&mut transform);

                commands.spawn((
                    Name::new("Fallback hull"),
                    Boat,
                    FallbackHull,
                    pose,
                    Mesh3d(meshes.add(Cuboid::from_size(FALLBACK_HULL_SIZE))),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: hex_color(FALLBACK_HULL_COLOR),
                        perceptual_roughness: 0.6,
                        ..default()
                    })),
                    transform,
                ));
            }
        }
    }
}
