use bevy::{
    input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit},
    prelude::*,
};
use shared::{orbit::OrbitState, viewport::RenderSurface};

/// Pixel-based scroll deltas (touchpads) are converted to wheel lines with this ratio.
const PIXELS_PER_SCROLL_LINE: f32 = 40.0;

#[derive(Component, Debug)]
pub struct OrbitController(pub OrbitState);

/// Left drag rotates, right drag pans, the wheel dollies.
pub fn orbit_input_system(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    surface: Res<RenderSurface>,
    mut controllers: Query<(&mut OrbitController, &Projection)>,
) {
    for (mut controller, projection) in controllers.iter_mut() {
        let orbit = &mut controller.0;

        if motion.delta != Vec2::ZERO {
            if mouse_buttons.pressed(MouseButton::Left) {
                orbit.rotate(motion.delta, surface.height);
            } else if mouse_buttons.pressed(MouseButton::Right) {
                if let Projection::Perspective(perspective) = projection {
                    orbit.pan(motion.delta, surface.height, perspective.fov);
                }
            }
        }

        let lines = match scroll.unit {
            MouseScrollUnit::Line => scroll.delta.y,
            MouseScrollUnit::Pixel => scroll.delta.y / PIXELS_PER_SCROLL_LINE,
        };
        if lines != 0.0 {
            orbit.zoom(lines);
        }
    }
}

/// One damping step per frame, then re-aim the camera at the orbit target.
pub fn orbit_damping_system(mut controllers: Query<(&mut OrbitController, &mut Transform)>) {
    for (mut controller, mut transform) in controllers.iter_mut() {
        let eye = controller.0.update();
        *transform = Transform::from_translation(eye).looking_at(controller.0.target, Vec3::Y);
    }
}
