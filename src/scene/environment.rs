//! Environment - plain data describing the backdrop around the model.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Linear distance fog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    pub color: Vec3,
    pub near: f32,
    pub far: f32,
}

impl Fog {
    /// Fog factor in `[0, 1]` at `distance` from the camera (0 = clear).
    #[must_use]
    pub fn factor(&self, distance: f32) -> f32 {
        if self.far <= self.near {
            return if distance >= self.far { 1.0 } else { 0.0 };
        }
        ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }
}

/// A flat ground plane lying on y = 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundPlane {
    pub size: f32,
    pub color: Vec3,
}

/// Grid helper drawn over the ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridHelper {
    pub size: f32,
    pub divisions: u32,
    pub color: Vec3,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// `None` leaves the backend's clear colour untouched.
    pub background: Option<Vec3>,
    pub fog: Option<Fog>,
    pub ground: Option<GroundPlane>,
    pub grid: Option<GridHelper>,
}
