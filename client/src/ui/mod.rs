pub mod loading_overlay;

use bevy::prelude::*;
use shared::sets::FrameSet;

use crate::ui::loading_overlay::{setup_loading_overlay, update_loading_overlay};

pub struct LoadingUiPlugin;
impl Plugin for LoadingUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_loading_overlay)
            .add_systems(Update, update_loading_overlay.in_set(FrameSet::Ui));
    }
}
