//! Render module
//!
//! Forward scene pass into an offscreen target, followed by the postprocess
//! chain, driven through one shared GpuDispatch.

mod renderer;
mod scene_renderer;

pub use renderer::Renderer;
pub use scene_renderer::SceneRenderer;
