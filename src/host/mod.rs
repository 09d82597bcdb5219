//! Scene host
//!
//! The surface-facing half of a viewer: viewport and resize handling, the
//! camera and its orbit controls, pointer input, frame timing and the
//! [`RenderBackend`] seam.

pub mod backend;
pub mod input;
pub mod orbit;
pub mod scene_host;
pub mod time;

pub use backend::{HeadlessBackend, RenderBackend, Viewport};
pub use input::{Input, PointerButton};
pub use orbit::OrbitControls;
pub use scene_host::SceneHost;
pub use time::{FpsCounter, Timer};
