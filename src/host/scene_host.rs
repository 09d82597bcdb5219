use crate::host::backend::{RenderBackend, Viewport};
use crate::host::input::Input;
use crate::host::orbit::OrbitControls;
use crate::host::time::{FpsCounter, Timer};
use crate::scene::{Camera, Scene};

/// Owns the drawing surface and everything drawn on it.
///
/// One frame is: orbit controls → world matrices → backend render → clear
/// per-frame input. Animation runs before this, in the viewer.
pub struct SceneHost {
    pub scene: Scene,
    pub camera: Camera,
    pub controls: Option<OrbitControls>,
    pub input: Input,

    viewport: Viewport,
    backend: Box<dyn RenderBackend>,
    timer: Timer,
    fps: FpsCounter,
    resize_listener: bool,
    frames_rendered: u64,
}

impl SceneHost {
    pub fn new(backend: Box<dyn RenderBackend>, viewport: Viewport, mut camera: Camera) -> Self {
        camera.aspect = viewport.aspect();
        camera.update_projection_matrix();

        let mut host = Self {
            scene: Scene::new(),
            camera,
            controls: None,
            input: Input::new(),
            viewport,
            backend,
            timer: Timer::new(),
            fps: FpsCounter::new(),
            resize_listener: true,
            frames_rendered: 0,
        };
        host.input.handle_resize(viewport.width, viewport.height);
        host.backend.resize(viewport);

        log::info!(
            "Scene host ready: {}x{} @{} on {}",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio,
            host.backend.name()
        );
        host
    }

    /// Enables orbit controls around the camera's current target.
    pub fn enable_orbit_controls(&mut self) {
        self.controls = Some(OrbitControls::from_camera(&self.camera));
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn backend(&self) -> &dyn RenderBackend {
        self.backend.as_ref()
    }

    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    #[must_use]
    pub fn fps(&self) -> f32 {
        self.fps.current_fps
    }

    #[must_use]
    pub fn is_listening_for_resize(&self) -> bool {
        self.resize_listener
    }

    /// Stops reacting to window resizes. Done on unmount.
    pub fn detach_resize_listener(&mut self) {
        self.resize_listener = false;
    }

    /// Applies a new window size: camera aspect, projection and backend
    /// surface. Ignored once the resize listener is detached, and for
    /// zero-area sizes.
    pub fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) -> bool {
        if !self.resize_listener || width == 0 || height == 0 {
            return false;
        }

        self.viewport = Viewport::new(width, height, pixel_ratio);
        self.camera.set_aspect_from_size(width, height);
        self.input.handle_resize(width, height);
        self.backend.resize(self.viewport);
        log::debug!("Viewport resized to {width}x{height} @{pixel_ratio}");
        true
    }

    /// Wall-clock seconds since the previous call.
    pub fn tick_timer(&mut self) -> f32 {
        self.timer.tick()
    }

    /// Draws one frame of `dt` seconds.
    pub fn render_frame(&mut self, dt: f32) {
        if let Some(controls) = self.controls.as_mut() {
            controls.update(&mut self.camera, &self.input, dt);
        }

        self.scene.update_matrix_world();

        match self.backend.render(&self.scene, &self.camera) {
            Ok(()) => self.frames_rendered += 1,
            Err(e) => log::error!("Render failed: {e}"),
        }

        self.input.end_frame();

        if let Some(fps) = self.fps.update(dt) {
            log::debug!("FPS: {fps:.1}");
        }
    }

    /// Hands the backend back, consuming the host.
    #[must_use]
    pub fn into_backend(self) -> Box<dyn RenderBackend> {
        self.backend
    }
}
