//! Orbit camera math.
//!
//! The camera sits on a sphere around a target point. User input does not move
//! the camera directly; it accumulates into pending deltas, and every frame
//! [`OrbitState::update`] applies a `damping_factor` share of them and decays
//! the remainder. Summed over frames the full input is applied, so the camera
//! glides to rest instead of stopping dead.

use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

use crate::constants::ORBIT_DAMPING_FACTOR;

/// Keeps the polar angle off the poles, where `looking_at` with a Y up vector degenerates.
const POLE_EPSILON: f32 = 1e-6;

/// Pending deltas below this are treated as settled.
const SETTLE_EPSILON: f32 = 1e-6;

/// Tunables for orbit controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitSettings {
    /// Share of pending motion applied per frame (0 < d <= 1)
    pub damping_factor: f32,
    pub rotate_speed: f32,
    /// Distance multiplier per scroll line towards the target
    pub zoom_step: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            damping_factor: ORBIT_DAMPING_FACTOR,
            rotate_speed: 1.0,
            zoom_step: 0.95,
            min_distance: 1.0,
            max_distance: 500.0,
        }
    }
}

/// Spherical coordinates around the target: `phi` is measured from +Y, `theta`
/// around Y starting at +Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrbitState {
    pub target: Vec3,
    pub spherical: Spherical,
    pub settings: OrbitSettings,
    pending_theta: f32,
    pending_phi: f32,
    pending_pan: Vec3,
    pending_scale: f32,
}

impl OrbitState {
    pub fn new(eye: Vec3, target: Vec3, settings: OrbitSettings) -> Self {
        Self {
            target,
            spherical: Spherical::from_offset(eye - target),
            settings,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_pan: Vec3::ZERO,
            pending_scale: 1.0,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.spherical.to_offset()
    }

    /// Camera right and up vectors for the current orbit position.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.eye()).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);
        (right, up)
    }

    /// Queues a rotation from a pointer drag of `delta` pixels.
    ///
    /// A drag across the full viewport height turns the camera one full revolution.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let scale = TAU * self.settings.rotate_speed / viewport_height;
        self.pending_theta -= delta.x * scale;
        self.pending_phi -= delta.y * scale;
    }

    /// Queues a pan so the point under the cursor follows a drag of `delta` pixels.
    pub fn pan(&mut self, delta: Vec2, viewport_height: f32, fov_y: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let target_distance = self.spherical.radius * (fov_y / 2.0).tan();
        let (right, up) = self.basis();
        let units_per_pixel = 2.0 * target_distance / viewport_height;
        self.pending_pan += -right * delta.x * units_per_pixel + up * delta.y * units_per_pixel;
    }

    /// Queues a dolly; positive `lines` (wheel up) moves towards the target.
    pub fn zoom(&mut self, lines: f32) {
        self.pending_scale *= self.settings.zoom_step.powf(lines);
    }

    /// Applies one damping step and returns the new eye position.
    pub fn update(&mut self) -> Vec3 {
        let damping = self.settings.damping_factor;

        self.spherical.theta += self.pending_theta * damping;
        self.spherical.phi += self.pending_phi * damping;
        self.spherical.phi = self.spherical.phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);

        self.spherical.radius = (self.spherical.radius * self.pending_scale)
            .clamp(self.settings.min_distance, self.settings.max_distance);
        self.pending_scale = 1.0;

        self.target += self.pending_pan * damping;

        self.pending_theta *= 1.0 - damping;
        self.pending_phi *= 1.0 - damping;
        self.pending_pan *= 1.0 - damping;

        self.eye()
    }

    pub fn is_settled(&self) -> bool {
        self.pending_theta.abs() < SETTLE_EPSILON
            && self.pending_phi.abs() < SETTLE_EPSILON
            && self.pending_pan.length() < SETTLE_EPSILON
            && self.pending_scale == 1.0
    }
}
