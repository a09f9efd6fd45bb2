//! GLSL sources for a scene and the stock shader pairs used by the
//! built-in presets.
//!
//! Every vertex shader in this project declares its position input as
//! [`POSITION_ATTRIBUTE`]; animated shaders additionally expose the
//! rotation through a uniform block member named [`TRANSFORM_UNIFORM`].
//! The renderer resolves both by name after compilation.

/// Name of the vertex position input every scene shader must declare.
pub const POSITION_ATTRIBUTE: &str = "inputPosition";

/// Name of the uniform block member carrying the 4x4 rotation matrix.
pub const TRANSFORM_UNIFORM: &str = "transformationMatrix";

/// A vertex/fragment GLSL pair, compiled together into one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Stock pair for the rotating logo: 3-component positions run
    /// through the transformation matrix.
    pub fn stock_logo() -> Self {
        Self::new(LOGO_VERTEX_GLSL, WHITE_FRAGMENT_GLSL)
    }

    /// Stock pair for the static triangle: 2-component positions pass
    /// straight through, no uniform.
    pub fn stock_triangle() -> Self {
        Self::new(TRIANGLE_VERTEX_GLSL, WHITE_FRAGMENT_GLSL)
    }
}

/// Vertex shader for animated scenes.
pub const LOGO_VERTEX_GLSL: &str = r"#version 450
layout(location = 0) in vec3 inputPosition;

layout(std140, set = 0, binding = 0) uniform SceneTransform {
    mat4 transformationMatrix;
} ubo;

void main() {
    gl_Position = ubo.transformationMatrix * vec4(inputPosition, 1.0);
}
";

/// Vertex shader for the static triangle.
pub const TRIANGLE_VERTEX_GLSL: &str = r"#version 450
layout(location = 0) in vec2 inputPosition;

void main() {
    gl_Position = vec4(inputPosition, 0.0, 1.0);
}
";

/// Fragment shader shared by every stock scene: opaque white.
pub const WHITE_FRAGMENT_GLSL: &str = r"#version 450
layout(location = 0) out vec4 outColor;

void main() {
    outColor = vec4(1.0, 1.0, 1.0, 1.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_sources_declare_the_expected_interface() {
        let logo = ShaderSource::stock_logo();
        assert!(logo.vertex.contains(POSITION_ATTRIBUTE));
        assert!(logo.vertex.contains(TRANSFORM_UNIFORM));
        assert!(logo.fragment.contains("outColor"));

        let triangle = ShaderSource::stock_triangle();
        assert!(triangle.vertex.contains(POSITION_ATTRIBUTE));
        assert!(!triangle.vertex.contains(TRANSFORM_UNIFORM));
    }
}
