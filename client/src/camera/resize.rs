use bevy::{
    prelude::*,
    window::{PrimaryWindow, WindowResized},
};
use shared::viewport::RenderSurface;

use super::MainCamera;

/// Keeps the main camera's aspect ratio and the tracked surface size in step with the window.
pub fn resize_system(
    mut resize_events: EventReader<WindowResized>,
    primary_window: Query<Entity, With<PrimaryWindow>>,
    mut surface: ResMut<RenderSurface>,
    mut projections: Query<&mut Projection, With<MainCamera>>,
) {
    let primary = primary_window.single().ok();

    for event in resize_events.read() {
        if primary.is_some_and(|window| window != event.window) {
            continue;
        }
        let Some(aspect_ratio) = surface.resize(event.width, event.height) else {
            debug!("Ignoring degenerate resize to {}x{}", event.width, event.height);
            continue;
        };
        for mut projection in projections.iter_mut() {
            if let Projection::Perspective(perspective) = projection.as_mut() {
                perspective.aspect_ratio = aspect_ratio;
            }
        }
        debug!("Render surface resized to {}x{}", event.width, event.height);
    }
}
