use bevy::prelude::*;

use crate::boat::loading::BoatLoad;

/// Marker component for the loading overlay UI
#[derive(Component)]
pub struct LoadingOverlay;

#[derive(Component)]
pub struct LoadingOverlayText;

/// Spawns the loading overlay UI
pub fn setup_loading_overlay(mut commands: Commands) {
    commands
        .spawn((
            LoadingOverlay,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                bottom: Val::Px(24.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
            Visibility::Visible,
        ))
        .with_children(|parent| {
            parent.spawn((
                LoadingOverlayText,
                Text::new("Loading boat..."),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgba(0.9, 0.9, 0.9, 1.0)),
            ));
        });
}

pub fn loading_label(load: &BoatLoad) -> String {
    match load.percent() {
        Some(percent) => format!("Loading boat... {:.0}%", percent),
        None => "Loading boat...".to_string(),
    }
}

/// Shows download progress until the boat (or its stand-in) is in the scene
pub fn update_loading_overlay(
    load: Option<Res<BoatLoad>>,
    mut overlay_query: Query<&mut Visibility, With<LoadingOverlay>>,
    mut text_query: Query<&mut Text, With<LoadingOverlayText>>,
) {
    let Some(load) = load else {
        return;
    };
    let Ok(mut visibility) = overlay_query.single_mut() else {
        return;
    };

    if load.is_resolved() {
        *visibility = Visibility::Hidden;
        return;
    }

    let label = loading_label(&load);
    if let Ok(mut text) = text_query.single_mut() {
        if text.0 != label {
            text.0 = label;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_hides_once_boat_is_resolved() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(BoatLoad::Resolved)
            .add_systems(Startup, setup_loading_overlay)
            .add_systems(Update, update_loading_overlay);
        app.update();

        let world = app.world_mut();
        let mut overlay = world.query_filtered::<&Visibility, With<LoadingOverlay>>();
        assert_eq!(*overlay.single(world).unwrap(), Visibility::Hidden);
    }

    #[test]
    fn test_label_without_progress() {
        assert_eq!(loading_label(&BoatLoad::Resolved), "Loading boat...");
    }
}
