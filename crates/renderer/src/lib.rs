//! Renderer crate for spinlogo.
//!
//! The crate glues the scene window, the `wgpu` pipeline, and the GLSL scene
//! sources together. The overall flow is:
//!
//! ```text
//!   CLI / spinlogo
//!          │ Scene + RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop ──▶ render_frame()
//!          ▲                                      │
//!          │                                      └─▶ plan_frame() ─▶ GPU pass
//! ```
//!
//! `GpuState` owns all GPU resources (surface, device, pipeline, transform
//! buffer), while `Renderer` is the thin entry point that opens the window.
//! Scene shaders are compiled through naga's GLSL frontend and reflected so
//! the geometry buffer and the rotation uniform land in the slots the shader
//! actually declares.

use anyhow::Result;

use scene::Scene;

mod compile;
mod error;
mod frame;
mod gpu;
mod runtime;
mod transform;
mod types;
mod window;

pub use error::{PipelineError, ShaderKind};
pub use frame::{plan_frame, DrawCall, FramePlan, CLEAR_COLOR};
pub use runtime::{
    clock_for_policy, BoxedFrameClock, FixedClock, FrameClock, FrameScheduler, RenderPolicy,
    SystemClock, TimeSample,
};
pub use transform::{rotation_angle, TransformUniforms};
pub use types::RendererConfig;

/// High-level entry point that owns the scene and configuration.
///
/// The heavy lifting lives inside the `window` and `gpu` modules; `Renderer`
/// simply opens the window and forwards the request.
pub struct Renderer {
    config: RendererConfig,
    scene: Scene,
}

impl Renderer {
    /// Builds a renderer for the supplied scene and configuration.
    pub fn new(scene: Scene, config: RendererConfig) -> Self {
        Self { config, scene }
    }

    /// Opens the scene window and drives the `winit` event loop until it
    /// closes.
    pub fn run(&mut self) -> Result<()> {
        window::run_windowed(&self.config, self.scene.clone())
    }
}
