//! Loads scene directories from disk: a `scene.toml` manifest naming the
//! shader sources, the vertex layout, and the optional rotation velocity.
//! Validation stays centralized here so higher layers only ever see a
//! well-formed [`Scene`].
//!
//! Types:
//!
//! - `ManifestError` classifies manifest parsing, validation, and I/O
//!   failures for error reporting in the `spinlogo` binary.
//! - `SceneManifest` mirrors the on-disk TOML layout with serde defaults
//!   that tolerate sparse manifests.
//! - `LocalScene` stores the resolved root directory and parsed manifest.
//!
//! Functions:
//!
//! - `LocalScene::load` reads `scene.toml`, validates it, and returns a
//!   filesystem-backed handle.
//! - `LocalScene::scene` reads the GLSL sources the manifest names and
//!   assembles the final [`Scene`], so later compilation errors point at
//!   shader code, not missing files.
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{GeometryBuffer, GeometryError};
use crate::shaders::ShaderSource;
use crate::{Model, Scene};

/// File name every scene directory must contain.
pub const MANIFEST_FILE: &str = "scene.toml";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest not found at {0}")]
    ManifestMissing(PathBuf),

    #[error("failed to parse manifest: {0}")]
    ManifestParse(#[from] toml::de::Error),

    #[error("manifest validation failed: {0:?}")]
    ManifestValidation(Vec<String>),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SceneManifest {
    #[serde(default)]
    pub scene: SceneSection,
    #[serde(default)]
    pub sources: Option<SourcesSection>,
    #[serde(default)]
    pub geometry: Option<GeometrySection>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SceneSection {
    pub name: Option<String>,
    #[serde(default = "default_components")]
    pub components: u32,
    #[serde(default)]
    pub velocity: Option<f64>,
}

impl Default for SceneSection {
    fn default() -> Self {
        Self {
            name: None,
            components: default_components(),
            velocity: None,
        }
    }
}

fn default_components() -> u32 {
    3
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourcesSection {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GeometrySection {
    #[serde(default)]
    pub vertices: Vec<f32>,
}

impl SceneManifest {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !matches!(self.scene.components, 2 | 3) {
            issues.push(format!(
                "components must be 2 or 3, got {}",
                self.scene.components
            ));
        }
        match (&self.sources, &self.geometry) {
            (Some(_), None) => {
                issues.push("[sources] declared without [geometry]; a drawable scene needs both".to_string());
            }
            (None, Some(_)) => {
                issues.push("[geometry] declared without [sources]; a drawable scene needs both".to_string());
            }
            _ => {}
        }
        if let Some(geometry) = &self.geometry {
            if matches!(self.scene.components, 2 | 3)
                && geometry.vertices.len() % self.scene.components as usize != 0
            {
                issues.push(format!(
                    "{} vertex floats do not divide into vertices of {} components",
                    geometry.vertices.len(),
                    self.scene.components
                ));
            }
        }
        if let Some(velocity) = self.scene.velocity {
            if !velocity.is_finite() {
                issues.push(format!("velocity must be finite, got {velocity}"));
            }
            if self.sources.is_none() {
                issues.push("velocity set on a scene with no shader sources".to_string());
            }
        }
        issues
    }
}

#[derive(Debug, Clone)]
pub struct LocalScene {
    root: PathBuf,
    manifest: SceneManifest,
}

impl LocalScene {
    pub fn load(root: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let root = root.as_ref().to_path_buf();
        let manifest_path = root.join(MANIFEST_FILE);
        if !manifest_path.exists() {
            return Err(ManifestError::ManifestMissing(manifest_path));
        }

        tracing::debug!(root = %root.display(), "loading scene manifest");
        let manifest_raw = fs::read_to_string(&manifest_path)?;
        let manifest: SceneManifest = toml::from_str(&manifest_raw)?;
        let issues = manifest.validate();
        if !issues.is_empty() {
            return Err(ManifestError::ManifestValidation(issues));
        }

        Ok(Self { root, manifest })
    }

    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    pub fn manifest(&self) -> &SceneManifest {
        &self.manifest
    }

    /// Reads the shader sources named by the manifest and assembles the
    /// runnable scene. A manifest with neither `[sources]` nor
    /// `[geometry]` produces a clear-only scene.
    pub fn scene(&self) -> Result<Scene, ManifestError> {
        let model = match (&self.manifest.sources, &self.manifest.geometry) {
            (Some(sources), Some(geometry)) => {
                let (vertex_path, fragment_path) = self.ensure_sources(sources)?;
                let shader = ShaderSource::new(
                    fs::read_to_string(&vertex_path)?,
                    fs::read_to_string(&fragment_path)?,
                );
                let geometry =
                    GeometryBuffer::new(geometry.vertices.clone(), self.manifest.scene.components)?;
                Some(Model {
                    shader,
                    geometry,
                    velocity: self.manifest.scene.velocity,
                })
            }
            _ => None,
        };
        Ok(Scene {
            name: self.scene_name(),
            model,
        })
    }

    /// Display name: the manifest's `name` or the directory stem.
    pub fn scene_name(&self) -> String {
        self.manifest.scene.name.clone().unwrap_or_else(|| {
            self.root
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "scene".to_string())
        })
    }

    fn ensure_sources(&self, sources: &SourcesSection) -> Result<(PathBuf, PathBuf), ManifestError> {
        let vertex_path = self.root.join(&sources.vertex);
        let fragment_path = self.root.join(&sources.fragment);
        let missing: Vec<_> = [&vertex_path, &fragment_path]
            .into_iter()
            .filter(|path| !path.exists())
            .collect();
        if !missing.is_empty() {
            return Err(ManifestError::ManifestValidation(
                missing
                    .into_iter()
                    .map(|path| format!("missing shader source: {}", path.display()))
                    .collect(),
            ));
        }
        Ok((vertex_path, fragment_path))
    }
}
