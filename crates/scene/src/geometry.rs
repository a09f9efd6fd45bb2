//! Vertex data for a scene: a flat float buffer plus the number of
//! components that make up one vertex.
//!
//! Buffers are validated on construction so the renderer can assume any
//! `GeometryBuffer` it receives divides cleanly into whole vertices.

use thiserror::Error;

/// Problems with raw vertex data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("unsupported component count {0}; expected 2 or 3 floats per vertex")]
    UnsupportedComponents(u32),
    #[error("buffer of {len} floats does not divide into vertices of {components} components")]
    RaggedBuffer { len: usize, components: u32 },
}

/// Tightly packed vertex positions, `components` floats per vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBuffer {
    floats: Vec<f32>,
    components: u32,
}

impl GeometryBuffer {
    pub fn new(floats: Vec<f32>, components: u32) -> Result<Self, GeometryError> {
        if !matches!(components, 2 | 3) {
            return Err(GeometryError::UnsupportedComponents(components));
        }
        if floats.len() % components as usize != 0 {
            return Err(GeometryError::RaggedBuffer {
                len: floats.len(),
                components,
            });
        }
        Ok(Self { floats, components })
    }

    pub fn floats(&self) -> &[f32] {
        &self.floats
    }

    pub fn components(&self) -> u32 {
        self.components
    }

    pub fn vertex_count(&self) -> u32 {
        (self.floats.len() / self.components as usize) as u32
    }

    /// Byte distance between consecutive vertices in the packed buffer.
    pub fn stride_bytes(&self) -> u64 {
        u64::from(self.components) * std::mem::size_of::<f32>() as u64
    }
}

/// Positions for the static triangle scene, two floats per vertex.
pub const TRIANGLE_VERTICES: [f32; 6] = [0.0, 0.5, 0.5, -0.5, -0.5, -0.5];

/// Positions for the logo mesh, three floats per vertex. Four thin
/// triangular blades around the origin so the spin reads clearly.
pub const LOGO_VERTICES: [f32; 36] = [
    0.0, 0.0, 0.0, 0.5, 0.1, 0.0, 0.1, 0.5, 0.0, // east blade
    0.0, 0.0, 0.0, -0.1, 0.5, 0.0, -0.5, 0.1, 0.0, // north blade
    0.0, 0.0, 0.0, -0.5, -0.1, 0.0, -0.1, -0.5, 0.0, // west blade
    0.0, 0.0, 0.0, 0.1, -0.5, 0.0, 0.5, -0.1, 0.0, // south blade
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_whole_vertices() {
        let buffer = GeometryBuffer::new(vec![0.0; 9], 3).expect("valid buffer");
        assert_eq!(buffer.vertex_count(), 3);
        assert_eq!(buffer.stride_bytes(), 12);
    }

    #[test]
    fn accepts_empty_buffer() {
        let buffer = GeometryBuffer::new(Vec::new(), 3).expect("empty buffer is whole");
        assert_eq!(buffer.vertex_count(), 0);
    }

    #[test]
    fn rejects_ragged_buffer() {
        let err = GeometryBuffer::new(vec![0.0; 7], 3).expect_err("ragged");
        assert_eq!(
            err,
            GeometryError::RaggedBuffer {
                len: 7,
                components: 3
            }
        );
    }

    #[test]
    fn rejects_unsupported_components() {
        for components in [0, 1, 4, 5] {
            let err = GeometryBuffer::new(vec![0.0; 12], components).expect_err("bad components");
            assert_eq!(err, GeometryError::UnsupportedComponents(components));
        }
    }

    #[test]
    fn stock_tables_divide_cleanly() {
        let triangle = GeometryBuffer::new(TRIANGLE_VERTICES.to_vec(), 2).expect("triangle");
        assert_eq!(triangle.vertex_count(), 3);
        let logo = GeometryBuffer::new(LOGO_VERTICES.to_vec(), 3).expect("logo");
        assert_eq!(logo.vertex_count(), 12);
    }
}
