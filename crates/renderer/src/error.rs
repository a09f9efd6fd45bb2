//! Failure taxonomy for pipeline construction. Every variant aborts
//! setup before the scene is used for drawing; the render loop never
//! sees a partially built program.

use std::fmt;

use thiserror::Error;

/// Which half of a shader pair a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{kind} shader failed to compile:\n{log}")]
    ShaderCompile { kind: ShaderKind, log: String },

    #[error("shader program failed to link:\n{log}")]
    ProgramLink { log: String },

    #[error("vertex shader declares no attribute named '{name}'")]
    AttributeNotFound { name: String },

    #[error("geometry supplies {buffer} components per vertex but the shader expects {shader}")]
    GeometryMismatch { buffer: u32, shader: u32 },

    #[error("no usable GPU context: {reason}")]
    ContextUnavailable { reason: String },
}

impl PipelineError {
    pub(crate) fn context_unavailable(reason: impl Into<String>) -> Self {
        Self::ContextUnavailable {
            reason: reason.into(),
        }
    }
}
