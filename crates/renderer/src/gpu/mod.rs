//! Device-facing half of the renderer, split into focused submodules:
//! `context` acquires the instance, adapter, device, and surface;
//! `pipeline` reflects compiled shaders and links the render pipeline;
//! `geometry` uploads vertex buffers; `state` ties them together and
//! encodes frames.

mod context;
mod geometry;
mod pipeline;
mod state;

pub(crate) use state::GpuState;
