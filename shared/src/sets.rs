use bevy::prelude::*;

/// Ordering of the per-frame work inside `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Asset polling and spawning of late-arriving entities
    Loading,
    /// Keyboard, mouse and window events
    Input,
    /// Boat pose and water clock
    Simulation,
    /// Orbit damping and reflection camera placement
    Camera,
    Ui,
}
