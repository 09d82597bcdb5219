//! Viewer
//!
//! A mounted viewer composes a [`SceneHost`], a background model load, the
//! animation mixer, the optional [`AnimationController`] and the
//! [`DebugPanel`], all configured by a [`ViewerConfig`].
//!
//! ```rust,ignore
//! let loader = AssetLoader::from_dir("public");
//! let mut viewer = Viewer::mount(
//!     ViewerConfig::robot(),
//!     &loader,
//!     Box::new(HeadlessBackend::new()),
//!     Viewport::new(1280, 720, 1.0),
//! )?;
//! pollster::block_on(viewer.ready())?;
//! viewer.dispatch(ViewerCommand::SelectState("Dance".into()))?;
//! viewer.frame(1.0 / 60.0);
//! viewer.unmount();
//! ```

pub mod command;
pub mod config;
pub mod controller;

pub use command::{ViewerCommand, ViewerState};
pub use config::{
    AnimationSetup, CameraConfig, LightConfig, ModelPlacement, MorphPanelSetup,
    StateMachineConfig, ViewerConfig,
};
pub use controller::AnimationController;

use glam::Vec3;

use crate::animation::AnimationMixer;
use crate::assets::{AssetLoader, LoadTicket, ModelInstance, Prefab};
use crate::errors::{MarionetteError, Result};
use crate::host::{RenderBackend, SceneHost, Viewport};
use crate::panel::DebugPanel;
use crate::scene::Scene;

/// Where the model load stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    /// Load failed; the viewer stays empty.
    Failed(String),
}

pub struct Viewer {
    config: ViewerConfig,
    host: SceneHost,
    ticket: Option<LoadTicket>,
    status: LoadStatus,

    model: Option<ModelInstance>,
    mixer: Option<AnimationMixer>,
    controller: Option<AnimationController>,
    panel: Option<DebugPanel>,
}

impl Viewer {
    /// Builds the host (camera, lights, environment) and starts loading the
    /// model in the background.
    pub fn mount(
        config: ViewerConfig,
        loader: &AssetLoader,
        backend: Box<dyn RenderBackend>,
        viewport: Viewport,
    ) -> Result<Self> {
        config.validate()?;

        let camera = config.camera.build(viewport.aspect());
        let mut host = SceneHost::new(backend, viewport, camera);
        for light in &config.lights {
            host.scene.add_light(light.build());
        }
        host.scene.environment = config.environment.clone();
        if config.orbit_controls {
            host.enable_orbit_controls();
        }

        let ticket = loader.load_in_background(&config.asset_path);
        log::info!("Mounted viewer '{}'", config.name);

        Ok(Self {
            config,
            host,
            ticket: Some(ticket),
            status: LoadStatus::Loading,
            model: None,
            mixer: None,
            controller: None,
            panel: None,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    #[must_use]
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    #[must_use]
    pub fn host(&self) -> &SceneHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut SceneHost {
        &mut self.host
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.host.scene
    }

    #[must_use]
    pub fn model(&self) -> Option<&ModelInstance> {
        self.model.as_ref()
    }

    #[must_use]
    pub fn mixer(&self) -> Option<&AnimationMixer> {
        self.mixer.as_ref()
    }

    #[must_use]
    pub fn controller(&self) -> Option<&AnimationController> {
        self.controller.as_ref()
    }

    #[must_use]
    pub fn panel(&self) -> Option<&DebugPanel> {
        self.panel.as_ref()
    }

    pub fn panel_mut(&mut self) -> Option<&mut DebugPanel> {
        self.panel.as_mut()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Waits for the background load and sets the model up. Resolves
    /// immediately if the load already completed.
    pub async fn ready(&mut self) -> Result<()> {
        if let Some(ticket) = self.ticket.take() {
            let result = ticket.wait().await;
            self.complete_load(result);
        }
        match &self.status {
            LoadStatus::Failed(message) => Err(MarionetteError::LoadFailed(message.clone())),
            _ => Ok(()),
        }
    }

    /// Advances the viewer by `dt` seconds and draws one frame.
    pub fn frame(&mut self, dt: f32) {
        self.poll_load();

        if let Some(mixer) = self.mixer.as_mut() {
            let events = mixer.update(dt, &mut self.host.scene);
            if let Some(controller) = self.controller.as_mut() {
                controller.handle_events(&events, mixer);
            }
        }

        if let Some(panel) = self.panel.as_mut() {
            panel.sync(&self.host.scene, self.controller.as_ref().map(AnimationController::view));
        }

        self.host.render_frame(dt);
    }

    /// [`frame`](Self::frame) with the wall-clock time since the last tick.
    pub fn tick(&mut self) {
        let dt = self.host.tick_timer();
        self.frame(dt);
    }

    /// Applies a panel command.
    pub fn dispatch(&mut self, command: ViewerCommand) -> Result<()> {
        match command {
            ViewerCommand::SelectState(name) => {
                let (controller, mixer) = self.animation_parts()?;
                controller.select_state(&name, mixer)?;
            }
            ViewerCommand::TriggerEmote(name) => {
                let (controller, mixer) = self.animation_parts()?;
                controller.trigger_emote(&name, mixer)?;
            }
            ViewerCommand::SetMorphInfluence { mesh, index, value } => {
                let mesh = self
                    .host
                    .scene
                    .meshes
                    .get_mut(mesh)
                    .ok_or(MarionetteError::InvalidMesh)?;
                mesh.morph_targets
                    .set(index, value)
                    .ok_or_else(|| MarionetteError::AssetIndexOutOfBounds {
                        context: format!("morph target of mesh '{}'", mesh.name),
                        index,
                    })?;
            }
        }

        if let Some(panel) = self.panel.as_mut() {
            panel.sync(&self.host.scene, self.controller.as_ref().map(AnimationController::view));
        }
        Ok(())
    }

    /// Applies every command, logging the ones that fail.
    pub fn dispatch_all(&mut self, commands: impl IntoIterator<Item = ViewerCommand>) {
        for command in commands {
            if let Err(e) = self.dispatch(command.clone()) {
                log::warn!("{command:?} failed: {e}");
            }
        }
    }

    /// Forwards a window resize to the host.
    pub fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) -> bool {
        self.host.resize(width, height, pixel_ratio)
    }

    /// Tears the viewer down: the panel goes first, then the resize
    /// listener, then the mixer and the backend are dropped with the rest.
    pub fn unmount(mut self) {
        self.panel = None;
        self.host.detach_resize_listener();
        if let Some(mixer) = self.mixer.as_mut() {
            mixer.stop_all();
        }
        log::info!("Unmounted viewer '{}'", self.config.name);
    }

    // ========================================================================
    // Loading
    // ========================================================================

    fn poll_load(&mut self) {
        let Some(result) = self.ticket.as_ref().and_then(LoadTicket::poll) else {
            return;
        };
        self.ticket = None;
        self.complete_load(result);
    }

    fn complete_load(&mut self, result: Result<Prefab>) {
        match result {
            Ok(prefab) => {
                self.setup_model(&prefab);
                self.status = LoadStatus::Ready;
            }
            Err(e) => {
                log::error!("Failed to load '{}': {e}", self.config.asset_path);
                self.status = LoadStatus::Failed(e.to_string());
            }
        }
    }

    fn setup_model(&mut self, prefab: &Prefab) {
        let scene = &mut self.host.scene;
        let instance = prefab.instantiate(scene, &self.config.name);

        if let Some(root) = scene.get_node_mut(instance.root) {
            root.transform.scale = Vec3::splat(self.config.model.scale);
            root.transform.position = self.config.model.position;
            root.transform.mark_dirty();
        }
        scene.update_subtree(instance.root);

        log::info!(
            "Model '{}' ready: {} clips {:?}",
            self.config.name,
            instance.clips.len(),
            prefab.clip_names()
        );

        match &self.config.animation {
            AnimationSetup::None => {}
            AnimationSetup::PlayFirst => {
                let mut mixer = Self::build_mixer(scene, &instance);
                if let Some(first) = instance.clips.first()
                    && let Err(e) = mixer.play(&first.name)
                {
                    log::warn!("Cannot play '{}': {e}", first.name);
                }
                self.mixer = Some(mixer);
            }
            AnimationSetup::StateMachine(sm) => {
                let mut mixer = Self::build_mixer(scene, &instance);
                let mut controller = AnimationController::new(sm.clone(), &mut mixer);
                if let Err(e) = controller.start(&mut mixer) {
                    log::error!("Cannot start state machine: {e}");
                }
                self.mixer = Some(mixer);
                self.controller = Some(controller);
            }
        }

        let mut panel = DebugPanel::new();
        if let Some(controller) = &self.controller {
            panel.add_state_folders(controller);
        }
        match &self.config.morph_panel {
            MorphPanelSetup::None => {}
            MorphPanelSetup::Named { node, title } => {
                if let Err(e) = panel.add_morph_folder_for_node(scene, instance.root, node, title) {
                    log::warn!("No expression folder: {e}");
                }
            }
            MorphPanelSetup::AllMeshes { fallback_title } => {
                panel.add_all_morph_folders(scene, instance.root, fallback_title);
            }
        }
        self.panel = Some(panel);
        self.model = Some(instance);
    }

    fn build_mixer(scene: &Scene, instance: &ModelInstance) -> AnimationMixer {
        let mut mixer = AnimationMixer::new(instance.root);
        for clip in &instance.clips {
            mixer.clip_action(clip.clone(), scene);
        }
        mixer
    }

    fn animation_parts(&mut self) -> Result<(&mut AnimationController, &mut AnimationMixer)> {
        match (self.controller.as_mut(), self.mixer.as_mut()) {
            (Some(controller), Some(mixer)) => Ok((controller, mixer)),
            _ => Err(MarionetteError::ModelNotLoaded),
        }
    }
}
