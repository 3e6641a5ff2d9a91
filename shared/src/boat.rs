use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{BOAT_MOVE_STEP, BOAT_TURN_STEP};

/// Discrete steering commands, one per key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BoatAction {
    TurnLeft,
    TurnRight,
    Forward,
    Backward,
}

impl BoatAction {
    pub const ALL: [BoatAction; 4] = [
        BoatAction::TurnLeft,
        BoatAction::TurnRight,
        BoatAction::Forward,
        BoatAction::Backward,
    ];
}

/// Marker for the steerable boat entity, whether it is the loaded model or the fallback hull.
#[derive(Component, Debug, Default)]
pub struct Boat;

/// Position on the water plus heading around the Y axis.
///
/// The heading is deliberately left unnormalized: repeated turns keep
/// accumulating, and the transform only ever sees it through sin/cos.
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct BoatPose {
    pub position: Vec3,
    pub yaw: f32,
}

impl BoatPose {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    /// Unit vector the boat travels along when moving forward.
    pub fn heading(&self) -> Vec3 {
        Vec3::new((-self.yaw).sin(), 0.0, (-self.yaw).cos())
    }

    pub fn apply(&mut self, action: BoatAction) {
        match action {
            BoatAction::TurnLeft => self.yaw += BOAT_TURN_STEP,
            BoatAction::TurnRight => self.yaw -= BOAT_TURN_STEP,
            BoatAction::Forward => self.position += self.heading() * BOAT_MOVE_STEP,
            BoatAction::Backward => self.position -= self.heading() * BOAT_MOVE_STEP,
        }
    }

    /// Writes position and heading into `transform`, leaving its scale alone.
    pub fn write_to(&self, transform: &mut Transform) {
        transform.translation = self.position;
        transform.rotation = Quat::from_rotation_y(self.yaw);
    }
}
