use crate::runtime::RenderPolicy;

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors CLI flags: how large the window should be, what
/// its title bar says, and how frames should be paced.
#[derive(Clone, Debug)]
pub struct RendererConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Title shown on the scene window.
    pub window_title: String,
    /// High-level render behaviour requested by the caller.
    pub policy: RenderPolicy,
}

impl Default for RendererConfig {
    /// Provides an 800x600 animated window.
    fn default() -> Self {
        Self {
            surface_size: (800, 600),
            window_title: "spinlogo".to_string(),
            policy: RenderPolicy::default(),
        }
    }
}
