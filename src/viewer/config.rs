use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{MarionetteError, Result};
use crate::scene::{
    Camera, Environment, Fog, GridHelper, GroundPlane, Light, LightKind, color_from_hex,
};

/// Perspective camera placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 50.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 2.0, 5.0),
            target: Vec3::ZERO,
        }
    }
}

impl CameraConfig {
    #[must_use]
    pub fn build(&self, aspect: f32) -> Camera {
        let mut camera = Camera::new_perspective(self.fov, aspect, self.near, self.far);
        camera.position = self.position;
        camera.look_at(self.target);
        camera
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
    #[serde(default)]
    pub position: Vec3,
}

impl LightConfig {
    #[must_use]
    pub fn ambient(hex: u32, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color: color_from_hex(hex),
            intensity,
            position: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn hemisphere(sky: u32, ground: u32, intensity: f32, position: Vec3) -> Self {
        Self {
            kind: LightKind::Hemisphere {
                ground_color: color_from_hex(ground),
            },
            color: color_from_hex(sky),
            intensity,
            position,
        }
    }

    #[must_use]
    pub fn directional(hex: u32, intensity: f32, position: Vec3) -> Self {
        Self {
            kind: LightKind::Directional,
            color: color_from_hex(hex),
            intensity,
            position,
        }
    }

    #[must_use]
    pub fn build(&self) -> Light {
        let light = match self.kind {
            LightKind::Ambient => Light::new_ambient(self.color, self.intensity),
            LightKind::Hemisphere { ground_color } => {
                Light::new_hemisphere(self.color, ground_color, self.intensity)
            }
            LightKind::Directional => Light::new_directional(self.color, self.intensity),
        };
        light.with_position(self.position)
    }
}

/// Where the loaded model is placed under its root node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPlacement {
    pub scale: f32,
    pub position: Vec3,
}

impl Default for ModelPlacement {
    fn default() -> Self {
        Self {
            scale: 1.0,
            position: Vec3::ZERO,
        }
    }
}

/// Named base states and emotes driven by the animation controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateMachineConfig {
    pub states: Vec<String>,
    pub emotes: Vec<String>,
    pub default_state: String,
    /// States at or past this index play once and hold their last pose.
    pub once_from_index: usize,
    /// Crossfade when selecting a base state, in seconds
    pub state_fade: f32,
    /// Crossfade into an emote and back out of it, in seconds
    pub emote_fade: f32,
}

impl Default for StateMachineConfig {
    fn default() -> Self {
        Self::robot()
    }
}

impl StateMachineConfig {
    #[must_use]
    pub fn robot() -> Self {
        let names = |list: &[&str]| -> Vec<String> { list.iter().map(ToString::to_string).collect() };
        Self {
            states: names(&[
                "Idle", "Walking", "Running", "Dance", "Death", "Sitting", "Standing",
            ]),
            emotes: names(&["Jump", "Yes", "No", "Wave", "Punch", "ThumbsUp"]),
            default_state: "Walking".to_string(),
            once_from_index: 4,
            state_fade: 0.5,
            emote_fade: 0.2,
        }
    }

    /// Whether `clip` should play once and clamp.
    #[must_use]
    pub fn is_one_shot(&self, clip: &str) -> bool {
        self.emotes.iter().any(|e| e == clip)
            || self
                .states
                .iter()
                .position(|s| s == clip)
                .is_some_and(|i| i >= self.once_from_index)
    }

    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    fn validate(&self) -> Result<()> {
        if self.states.is_empty() {
            return Err(invalid("animation.states", "at least one state is required"));
        }
        if !self.states.contains(&self.default_state) {
            return Err(invalid(
                "animation.default_state",
                format!("'{}' is not one of the states", self.default_state),
            ));
        }
        if let Some(dup) = self.emotes.iter().find(|e| self.states.contains(e)) {
            return Err(invalid(
                "animation.emotes",
                format!("'{dup}' is both a state and an emote"),
            ));
        }
        if !(self.state_fade >= 0.0 && self.emote_fade >= 0.0) {
            return Err(invalid("animation.*_fade", "fade durations must be >= 0"));
        }
        Ok(())
    }
}

/// How clips are driven once the model is loaded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AnimationSetup {
    /// Clips are loaded but nothing plays.
    #[default]
    None,
    /// The first clip in the file loops on its own.
    PlayFirst,
    /// States and emotes through the animation controller.
    StateMachine(StateMachineConfig),
}

/// Which meshes get an expression folder in the debug panel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MorphPanelSetup {
    #[default]
    None,
    /// One folder for the mesh on the named node.
    Named { node: String, title: String },
    /// One folder per mesh with morph targets, titled with the mesh name or
    /// `fallback_title` when the mesh is unnamed.
    AllMeshes { fallback_title: String },
}

/// Everything that distinguishes one viewer from another.
///
/// Presets exist for the three shipped viewers; any field can be
/// overridden with the `with_*` builders or loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub name: String,
    pub asset_path: String,
    pub camera: CameraConfig,
    pub orbit_controls: bool,
    pub lights: Vec<LightConfig>,
    pub environment: Environment,
    pub model: ModelPlacement,
    pub animation: AnimationSetup,
    pub morph_panel: MorphPanelSetup,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            name: "viewer".to_string(),
            asset_path: String::new(),
            camera: CameraConfig::default(),
            orbit_controls: false,
            lights: Vec::new(),
            environment: Environment::default(),
            model: ModelPlacement::default(),
            animation: AnimationSetup::None,
            morph_panel: MorphPanelSetup::None,
        }
    }
}

impl ViewerConfig {
    // ========================================================================
    // Presets
    // ========================================================================

    /// Expressive robot: state machine, emotes and face sliders.
    #[must_use]
    pub fn robot() -> Self {
        let backdrop = color_from_hex(0xe0e0e0);
        Self {
            name: "robot".to_string(),
            asset_path: "/RobotExpressive.glb".to_string(),
            camera: CameraConfig {
                fov: 45.0,
                near: 0.25,
                far: 100.0,
                position: Vec3::new(-5.0, 3.0, 10.0),
                target: Vec3::new(0.0, 2.0, 0.0),
            },
            orbit_controls: false,
            lights: vec![
                LightConfig::hemisphere(0xffffff, 0x8d8d8d, 3.0, Vec3::new(0.0, 20.0, 0.0)),
                LightConfig::directional(0xffffff, 3.0, Vec3::new(0.0, 20.0, 10.0)),
            ],
            environment: Environment {
                background: Some(backdrop),
                fog: Some(Fog {
                    color: backdrop,
                    near: 20.0,
                    far: 100.0,
                }),
                ground: Some(GroundPlane {
                    size: 2000.0,
                    color: color_from_hex(0xcbcbcb),
                }),
                grid: Some(GridHelper {
                    size: 200.0,
                    divisions: 40,
                    color: Vec3::ZERO,
                    opacity: 0.2,
                }),
            },
            model: ModelPlacement::default(),
            animation: AnimationSetup::StateMachine(StateMachineConfig::robot()),
            morph_panel: MorphPanelSetup::Named {
                node: "Head_4".to_string(),
                title: "Expressions".to_string(),
            },
        }
    }

    /// Cyber mecha: first clip loops, every morph mesh gets sliders.
    #[must_use]
    pub fn mecha() -> Self {
        Self {
            name: "mecha".to_string(),
            asset_path: "/cyber_mecha.glb".to_string(),
            camera: CameraConfig::default(),
            orbit_controls: true,
            lights: vec![
                LightConfig::ambient(0x00ffff, 0.4),
                LightConfig::directional(0x00ccff, 2.0, Vec3::new(5.0, 5.0, 5.0)),
            ],
            environment: Environment::default(),
            model: ModelPlacement {
                scale: 1.5,
                position: Vec3::new(0.0, -1.0, 0.0),
            },
            animation: AnimationSetup::PlayFirst,
            morph_panel: MorphPanelSetup::AllMeshes {
                fallback_title: "Expressions".to_string(),
            },
        }
    }

    /// Static "like" model with orbit camera.
    #[must_use]
    pub fn like() -> Self {
        Self {
            name: "like".to_string(),
            asset_path: "/like.glb".to_string(),
            camera: CameraConfig::default(),
            orbit_controls: true,
            lights: vec![
                LightConfig::ambient(0xffffff, 0.5),
                LightConfig::directional(0xff80bf, 2.0, Vec3::new(5.0, 5.0, 5.0)),
                LightConfig::directional(0x00ffff, 0.6, Vec3::new(-5.0, -3.0, -2.0)),
            ],
            environment: Environment::default(),
            model: ModelPlacement {
                scale: 1.8,
                position: Vec3::ZERO,
            },
            animation: AnimationSetup::None,
            morph_panel: MorphPanelSetup::None,
        }
    }

    /// Looks a preset up by name (`robot`, `mecha`, `like`).
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "robot" => Some(Self::robot()),
            "mecha" => Some(Self::mecha()),
            "like" => Some(Self::like()),
            _ => None,
        }
    }

    // ========================================================================
    // Builders
    // ========================================================================

    #[must_use]
    pub fn with_asset_path(mut self, path: impl Into<String>) -> Self {
        self.asset_path = path.into();
        self
    }

    #[must_use]
    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    #[must_use]
    pub fn with_orbit_controls(mut self, enabled: bool) -> Self {
        self.orbit_controls = enabled;
        self
    }

    #[must_use]
    pub fn with_light(mut self, light: LightConfig) -> Self {
        self.lights.push(light);
        self
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn with_model_placement(mut self, scale: f32, position: Vec3) -> Self {
        self.model = ModelPlacement { scale, position };
        self
    }

    #[must_use]
    pub fn with_animation(mut self, animation: AnimationSetup) -> Self {
        self.animation = animation;
        self
    }

    #[must_use]
    pub fn with_morph_panel(mut self, morph_panel: MorphPanelSetup) -> Self {
        self.morph_panel = morph_panel;
        self
    }

    // ========================================================================
    // Loading & validation
    // ========================================================================

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<()> {
        if self.asset_path.trim().is_empty() {
            return Err(invalid("asset_path", "must not be empty"));
        }

        let cam = &self.camera;
        if !(cam.fov > 0.0 && cam.fov < 180.0) {
            return Err(invalid("camera.fov", format!("{} is outside (0, 180)", cam.fov)));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(invalid(
                "camera.near/far",
                format!("need 0 < near < far, got {} / {}", cam.near, cam.far),
            ));
        }

        if !(self.model.scale > 0.0) {
            return Err(invalid("model.scale", "must be positive"));
        }

        if let Some(i) = self.lights.iter().position(|l| !(l.intensity >= 0.0)) {
            return Err(invalid(&format!("lights[{i}].intensity"), "must be >= 0"));
        }

        if let AnimationSetup::StateMachine(sm) = &self.animation {
            sm.validate()?;
        }

        Ok(())
    }
}

fn invalid(field: &str, message: impl Into<String>) -> MarionetteError {
    MarionetteError::InvalidConfig {
        field: field.to_string(),
        message: message.into(),
    }
}
