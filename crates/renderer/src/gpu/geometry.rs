use wgpu::util::DeviceExt;

use scene::GeometryBuffer;

use crate::error::PipelineError;

use super::pipeline::VertexInterface;

/// A vertex buffer uploaded to the device together with the attribute
/// layout the pipeline binds it with.
pub(crate) struct GeometryBinding {
    pub buffer: wgpu::Buffer,
    attributes: [wgpu::VertexAttribute; 1],
    array_stride: wgpu::BufferAddress,
}

impl GeometryBinding {
    pub fn new(
        device: &wgpu::Device,
        geometry: &GeometryBuffer,
        interface: &VertexInterface,
    ) -> Result<Self, PipelineError> {
        let format = matching_format(geometry, interface)?;
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("scene vertex buffer"),
            contents: bytemuck::cast_slice(geometry.floats()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Ok(Self {
            buffer,
            attributes: [wgpu::VertexAttribute {
                format,
                offset: 0,
                shader_location: interface.position.location,
            }],
            array_stride: geometry.stride_bytes(),
        })
    }

    pub fn layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

/// Refuses to pair a buffer with a shader that consumes a different
/// vertex width, picking the wgpu vertex format on success.
pub(crate) fn matching_format(
    geometry: &GeometryBuffer,
    interface: &VertexInterface,
) -> Result<wgpu::VertexFormat, PipelineError> {
    if geometry.components() != interface.position.components {
        return Err(PipelineError::GeometryMismatch {
            buffer: geometry.components(),
            shader: interface.position.components,
        });
    }
    match geometry.components() {
        2 => Ok(wgpu::VertexFormat::Float32x2),
        _ => Ok(wgpu::VertexFormat::Float32x3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::pipeline::plan_program;
    use scene::{ShaderSource, TRIANGLE_VERTICES};

    #[test]
    fn mismatched_widths_are_rejected() {
        let triangle = GeometryBuffer::new(TRIANGLE_VERTICES.to_vec(), 2).expect("triangle");
        let logo_interface = plan_program(&ShaderSource::stock_logo()).expect("logo reflects");
        let err = matching_format(&triangle, &logo_interface).expect_err("widths differ");
        assert!(matches!(
            err,
            PipelineError::GeometryMismatch {
                buffer: 2,
                shader: 3
            }
        ));
    }

    #[test]
    fn matched_widths_pick_the_packed_format() {
        let triangle = GeometryBuffer::new(TRIANGLE_VERTICES.to_vec(), 2).expect("triangle");
        let interface = plan_program(&ShaderSource::stock_triangle()).expect("triangle reflects");
        let format = matching_format(&triangle, &interface).expect("widths match");
        assert_eq!(format, wgpu::VertexFormat::Float32x2);
    }
}
