pub mod controller;
pub mod loading;

use bevy::prelude::*;
use shared::sets::FrameSet;

use controller::{boat_keyboard_system, sync_boat_transform_system};
use loading::{poll_boat_load, request_boat_load, spawn_boat, BoatLoadOutcome};

/// Loads the boat (or its stand-in) and steers it from the keyboard.
pub struct BoatPlugin;

impl Plugin for BoatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BoatLoadOutcome>()
            .add_systems(Startup, request_boat_load)
            .add_systems(
                Update,
                (poll_boat_load, spawn_boat)
                    .chain()
                    .in_set(FrameSet::Loading),
            )
            .add_systems(Update, boat_keyboard_system.in_set(FrameSet::Input))
            .add_systems(
                Update,
                sync_boat_transform_system.in_set(FrameSet::Simulation),
            );
    }
}
