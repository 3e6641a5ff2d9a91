use bevy::prelude::*;

/// Size of the surface the main camera renders into, in logical pixels.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct RenderSurface {
    pub width: f32,
    pub height: f32,
}

impl RenderSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    /// Applies a resize, returning the new aspect ratio.
    ///
    /// Degenerate sizes (a minimized window reports 0 x 0) are ignored so the
    /// projection never sees an infinite or NaN aspect ratio.
    pub fn resize(&mut self, width: f32, height: f32) -> Option<f32> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        self.width = width;
        self.height = height;
        Some(self.aspect_ratio())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_aspect() {
        let surface = RenderSurface::new(800.0, 600.0);
        assert!((surface.aspect_ratio() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_resize_tracks_latest_size() {
        let mut surface = RenderSurface::new(800.0, 600.0);
        let aspect = surface.resize(1024.0, 768.0);
        assert_eq!(surface, RenderSurface::new(1024.0, 768.0));
        assert!((aspect.unwrap() - 4.0 / 3.0).abs() < 1e-6);

        let aspect = surface.resize(1920.0, 1080.0);
        assert!((aspect.unwrap() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut surface = RenderSurface::new(800.0, 600.0);
        surface.resize(640.0, 480.0);
        let once = surface;
        surface.resize(640.0, 480.0);
        assert_eq!(surface, once);
    }

    #[test]
    fn test_minimized_window_is_ignored() {
        let mut surface = RenderSurface::new(800.0, 600.0);
        assert_eq!(surface.resize(0.0, 0.0), None);
        assert_eq!(surface, RenderSurface::new(800.0, 600.0));
    }
}
