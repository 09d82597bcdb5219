use crate::errors::Result;
use crate::scene::{Camera, Scene};

/// Size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Logical width in CSS/window points
    pub width: u32,
    /// Logical height in CSS/window points
    pub height: u32,
    pub pixel_ratio: f32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 },
        }
    }

    #[must_use]
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.width as f32 * self.pixel_ratio).round() as u32,
            (self.height as f32 * self.pixel_ratio).round() as u32,
        )
    }

    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720, 1.0)
    }
}

/// What the host draws through.
///
/// Implementations own the GPU (or other) surface; the host only tells them
/// the surface size and hands over the scene once per frame.
pub trait RenderBackend {
    fn resize(&mut self, viewport: Viewport);

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()>;

    fn name(&self) -> &str {
        "backend"
    }
}

/// Backend with no surface. Records what it was asked to draw.
#[derive(Debug, Default, Clone)]
pub struct HeadlessBackend {
    pub frames_rendered: u64,
    pub last_viewport: Option<Viewport>,
    /// Visible nodes carrying a mesh in the last rendered frame
    pub last_draw_count: usize,
}

impl HeadlessBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for HeadlessBackend {
    fn resize(&mut self, viewport: Viewport) {
        self.last_viewport = Some(viewport);
    }

    fn render(&mut self, scene: &Scene, _camera: &Camera) -> Result<()> {
        self.last_draw_count = scene
            .nodes
            .values()
            .filter(|n| n.visible && n.mesh.is_some())
            .count();
        self.frames_rendered += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        "headless"
    }
}
