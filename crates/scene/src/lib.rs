mod geometry;
mod manifest;
mod shaders;

pub use geometry::{GeometryBuffer, GeometryError, LOGO_VERTICES, TRIANGLE_VERTICES};
pub use manifest::{
    GeometrySection, LocalScene, ManifestError, SceneManifest, SceneSection, SourcesSection,
    MANIFEST_FILE,
};
pub use shaders::{
    ShaderSource, LOGO_VERTEX_GLSL, POSITION_ATTRIBUTE, TRANSFORM_UNIFORM, TRIANGLE_VERTEX_GLSL,
    WHITE_FRAGMENT_GLSL,
};

use std::path::PathBuf;

/// Preset rendered when no scene argument is given.
pub const DEFAULT_SCENE: &str = "rotating-logo";

/// Rotation speed of the stock logo in degrees per second.
pub const LOGO_VELOCITY_DEG_PER_SEC: f64 = 90.0;

/// A fully assembled scene: a name for diagnostics plus an optional
/// drawable model. A scene without a model only clears the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub name: String,
    pub model: Option<Model>,
}

impl Scene {
    /// Whether the scene changes over time and needs continuous redraws.
    pub fn animates(&self) -> bool {
        self.model
            .as_ref()
            .is_some_and(|model| model.velocity.is_some())
    }
}

/// Everything needed to draw: the shader pair, the vertex data, and an
/// optional rotation velocity in degrees per second.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub shader: ShaderSource,
    pub geometry: GeometryBuffer,
    pub velocity: Option<f64>,
}

/// The three scenes that ship with the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePreset {
    ClearOnly,
    StaticTriangle,
    RotatingLogo,
}

impl ScenePreset {
    pub fn from_name(input: &str) -> Option<Self> {
        match input {
            "clear-only" | "clear" => Some(Self::ClearOnly),
            "static-triangle" | "triangle" => Some(Self::StaticTriangle),
            "rotating-logo" | "logo" => Some(Self::RotatingLogo),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ClearOnly => "clear-only",
            Self::StaticTriangle => "static-triangle",
            Self::RotatingLogo => "rotating-logo",
        }
    }

    pub fn build(&self) -> Scene {
        let model = match self {
            Self::ClearOnly => None,
            Self::StaticTriangle => Some(Model {
                shader: ShaderSource::stock_triangle(),
                geometry: GeometryBuffer::new(TRIANGLE_VERTICES.to_vec(), 2)
                    .expect("stock triangle table divides into whole vertices"),
                velocity: None,
            }),
            Self::RotatingLogo => Some(Model {
                shader: ShaderSource::stock_logo(),
                geometry: GeometryBuffer::new(LOGO_VERTICES.to_vec(), 3)
                    .expect("stock logo table divides into whole vertices"),
                velocity: Some(LOGO_VELOCITY_DEG_PER_SEC),
            }),
        };
        Scene {
            name: self.name().to_string(),
            model,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneHandle {
    Preset(ScenePreset),
    Directory(PathBuf),
}

impl SceneHandle {
    /// Preset names resolve to built-in scenes; anything else is treated
    /// as a path to a scene directory.
    pub fn from_input(input: &str) -> Self {
        match ScenePreset::from_name(input) {
            Some(preset) => Self::Preset(preset),
            None => Self::Directory(PathBuf::from(input)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_preset_names() {
        assert_eq!(
            SceneHandle::from_input("rotating-logo"),
            SceneHandle::Preset(ScenePreset::RotatingLogo)
        );
        assert_eq!(
            SceneHandle::from_input("triangle"),
            SceneHandle::Preset(ScenePreset::StaticTriangle)
        );
        assert_eq!(
            SceneHandle::from_input("clear"),
            SceneHandle::Preset(ScenePreset::ClearOnly)
        );
    }

    #[test]
    fn parses_directory_path() {
        assert!(matches!(
            SceneHandle::from_input("scenes/demo"),
            SceneHandle::Directory(path) if path == PathBuf::from("scenes/demo")
        ));
    }

    #[test]
    fn clear_only_has_no_model() {
        let scene = ScenePreset::ClearOnly.build();
        assert!(scene.model.is_none());
        assert!(!scene.animates());
    }

    #[test]
    fn static_triangle_matches_stock_table() {
        let scene = ScenePreset::StaticTriangle.build();
        let model = scene.model.as_ref().expect("drawable");
        assert_eq!(model.geometry.components(), 2);
        assert_eq!(model.geometry.vertex_count(), 3);
        assert_eq!(model.geometry.floats(), &TRIANGLE_VERTICES);
        assert!(model.velocity.is_none());
        assert!(!scene.animates());
    }

    #[test]
    fn rotating_logo_animates() {
        let scene = ScenePreset::RotatingLogo.build();
        assert!(scene.animates());
        let model = scene.model.expect("drawable");
        assert_eq!(model.geometry.components(), 3);
        assert_eq!(model.velocity, Some(LOGO_VELOCITY_DEG_PER_SEC));
    }
}
