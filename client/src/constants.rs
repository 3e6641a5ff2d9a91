pub const BINDS_PATH: &str = "keybindings.ron";
pub const WINDOW_TITLE: &str = "Sailboat";

/// Directional light strength; the scene is lit like an overcast day.
pub const SUN_ILLUMINANCE: f32 = 10_000.0;
pub const AMBIENT_BRIGHTNESS: f32 = 400.0;

/// Render layer holding the ocean plane, hidden from the reflection camera.
pub const OCEAN_RENDER_LAYER: usize = 1;
