use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Light variants the viewers use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightKind {
    Ambient,
    /// Sky colour is the light colour; `ground_color` lights from below.
    Hemisphere { ground_color: Vec3 },
    Directional,
}

#[derive(Debug, Clone)]
pub struct Light {
    pub uuid: Uuid,
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    pub kind: LightKind,
}

impl Light {
    #[must_use]
    pub fn new_ambient(color: Vec3, intensity: f32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            color,
            intensity,
            position: Vec3::ZERO,
            kind: LightKind::Ambient,
        }
    }

    #[must_use]
    pub fn new_hemisphere(sky_color: Vec3, ground_color: Vec3, intensity: f32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            color: sky_color,
            intensity,
            position: Vec3::Y,
            kind: LightKind::Hemisphere { ground_color },
        }
    }

    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            color,
            intensity,
            position: Vec3::Y,
            kind: LightKind::Directional,
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Direction the light travels, for directional lights aimed at the origin.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalize_or_zero()
    }
}

/// Converts a `0xRRGGBB` colour into linear-ish RGB in `[0, 1]`.
#[must_use]
pub fn color_from_hex(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(r, g, b)
}
