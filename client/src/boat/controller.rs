use crate::input::{keyboard::action_for_key, KeyMap};
use bevy::{
    input::{keyboard::KeyboardInput, ButtonState},
    prelude::*,
};
use shared::boat::{Boat, BoatPose};

/// Applies one boat action per key-down event.
///
/// Reads raw keyboard events rather than `ButtonInput` so that OS key repeat
/// keeps the boat moving while a key is held. Events that arrive before the
/// boat has been spawned are dropped.
pub fn boat_keyboard_system(
    mut key_events: EventReader<KeyboardInput>,
    key_map: Res<KeyMap>,
    mut boats: Query<&mut BoatPose, With<Boat>>,
) {
    for event in key_events.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        let Some(action) = action_for_key(event.key_code, &key_map) else {
            continue;
        };
        let Ok(mut pose) = boats.single_mut() else {
            debug!("Ignoring {:?}: boat not spawned yet", action);
            continue;
        };
        pose.apply(action);
    }
}

pub fn sync_boat_transform_system(
    mut boats: Query<(&BoatPose, &mut Transform), (With<Boat>, Changed<BoatPose>)>,
) {
    for (pose, mut transform) in boats.iter_mut() {
        pose.write_to(&mut transform);
    }
}
