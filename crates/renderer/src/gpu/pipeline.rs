use wgpu::naga;
use wgpu::naga::ShaderStage;

use scene::{ShaderSource, POSITION_ATTRIBUTE, TRANSFORM_UNIFORM};

use crate::compile::{compile_stage, create_shader_module, CompiledShader};
use crate::error::{PipelineError, ShaderKind};

use super::geometry::GeometryBinding;

/// Location and width of the position attribute in a vertex shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AttributeSlot {
    pub location: u32,
    pub components: u32,
}

/// Bind point of the uniform block that carries the transform matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TransformSlot {
    pub group: u32,
    pub binding: u32,
}

/// What reflection learned about a compiled vertex shader: where the
/// position attribute lives and whether a transform uniform exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VertexInterface {
    pub position: AttributeSlot,
    pub transform: Option<TransformSlot>,
}

/// Compiles both stages on the CPU and reflects the vertex interface.
/// This is the fallible front half of program construction; device
/// objects are only created once it succeeds.
pub(crate) fn plan_program(source: &ShaderSource) -> Result<VertexInterface, PipelineError> {
    let vertex = compile_stage(&source.vertex, ShaderKind::Vertex)?;
    compile_stage(&source.fragment, ShaderKind::Fragment)?;
    resolve_interface(&vertex)
}

fn resolve_interface(vertex: &CompiledShader) -> Result<VertexInterface, PipelineError> {
    let module = &vertex.module;
    let entry = module
        .entry_points
        .iter()
        .find(|entry| entry.stage == ShaderStage::Vertex)
        .ok_or_else(|| PipelineError::ShaderCompile {
            kind: ShaderKind::Vertex,
            log: "shader declares no vertex entry point".to_string(),
        })?;

    let mut position = None;
    for argument in &entry.function.arguments {
        if argument.name.as_deref() != Some(POSITION_ATTRIBUTE) {
            continue;
        }
        let location = match argument.binding {
            Some(naga::Binding::Location { location, .. }) => location,
            _ => break,
        };
        let components =
            float_components(module, argument.ty).ok_or_else(|| PipelineError::ShaderCompile {
                kind: ShaderKind::Vertex,
                log: format!("attribute '{POSITION_ATTRIBUTE}' must be a float scalar or vector"),
            })?;
        position = Some(AttributeSlot {
            location,
            components,
        });
        break;
    }
    let position = position.ok_or_else(|| PipelineError::AttributeNotFound {
        name: POSITION_ATTRIBUTE.to_string(),
    })?;

    Ok(VertexInterface {
        position,
        transform: find_transform_slot(module),
    })
}

fn float_components(module: &naga::Module, ty: naga::Handle<naga::Type>) -> Option<u32> {
    match &module.types[ty].inner {
        naga::TypeInner::Scalar(scalar) if scalar.kind == naga::ScalarKind::Float => Some(1),
        naga::TypeInner::Vector { size, scalar } if scalar.kind == naga::ScalarKind::Float => {
            Some(match size {
                naga::VectorSize::Bi => 2,
                naga::VectorSize::Tri => 3,
                naga::VectorSize::Quad => 4,
            })
        }
        _ => None,
    }
}

fn find_transform_slot(module: &naga::Module) -> Option<TransformSlot> {
    for (_, variable) in module.global_variables.iter() {
        if variable.space != naga::AddressSpace::Uniform {
            continue;
        }
        let Some(binding) = &variable.binding else {
            continue;
        };
        if let naga::TypeInner::Struct { members, .. } = &module.types[variable.ty].inner {
            if members
                .iter()
                .any(|member| member.name.as_deref() == Some(TRANSFORM_UNIFORM))
            {
                return Some(TransformSlot {
                    group: binding.group,
                    binding: binding.binding,
                });
            }
        }
    }
    None
}

pub(crate) struct LinkedProgram {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_layout: Option<wgpu::BindGroupLayout>,
}

impl LinkedProgram {
    pub fn new(
        device: &wgpu::Device,
        source: &ShaderSource,
        interface: &VertexInterface,
        geometry: &GeometryBinding,
        surface_format: wgpu::TextureFormat,
    ) -> Result<Self, PipelineError> {
        let vertex_module = create_shader_module(device, &source.vertex, ShaderKind::Vertex)?;
        let fragment_module = create_shader_module(device, &source.fragment, ShaderKind::Fragment)?;

        if let Some(slot) = interface.transform {
            if slot.group != 0 {
                return Err(PipelineError::ProgramLink {
                    log: format!(
                        "transform uniform must live in bind group 0, found group {}",
                        slot.group
                    ),
                });
            }
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let uniform_layout = interface.transform.map(|slot| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("transform layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: slot.binding,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            })
        });

        let mut bind_group_layouts = Vec::new();
        if let Some(layout) = uniform_layout.as_ref() {
            bind_group_layouts.push(layout);
        }
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene pipeline layout"),
            bind_group_layouts: &bind_group_layouts,
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: &[geometry.layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(PipelineError::ProgramLink {
                log: error.to_string(),
            });
        }

        Ok(Self {
            pipeline,
            uniform_layout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene::WHITE_FRAGMENT_GLSL;

    #[test]
    fn logo_interface_exposes_position_and_transform() {
        let interface = plan_program(&ShaderSource::stock_logo()).expect("logo reflects");
        assert_eq!(interface.position.location, 0);
        assert_eq!(interface.position.components, 3);
        assert_eq!(
            interface.transform,
            Some(TransformSlot {
                group: 0,
                binding: 0
            })
        );
    }

    #[test]
    fn triangle_interface_has_no_transform() {
        let interface = plan_program(&ShaderSource::stock_triangle()).expect("triangle reflects");
        assert_eq!(interface.position.components, 2);
        assert!(interface.transform.is_none());
    }

    #[test]
    fn renamed_attribute_is_rejected() {
        let vertex = "#version 450\n\
                      layout(location = 0) in vec2 wrongName;\n\
                      void main() { gl_Position = vec4(wrongName, 0.0, 1.0); }\n";
        let err = plan_program(&ShaderSource::new(vertex, WHITE_FRAGMENT_GLSL))
            .expect_err("attribute missing");
        assert!(
            matches!(err, PipelineError::AttributeNotFound { name } if name == POSITION_ATTRIBUTE)
        );
    }

    #[test]
    fn broken_vertex_stops_the_program() {
        let err = plan_program(&ShaderSource::new("#version 450\nvoid main( {}", WHITE_FRAGMENT_GLSL))
            .expect_err("vertex compile fails");
        assert!(matches!(
            err,
            PipelineError::ShaderCompile {
                kind: ShaderKind::Vertex,
                ..
            }
        ));
    }

    #[test]
    fn broken_fragment_stops_the_program() {
        let source = ShaderSource::new(
            scene::TRIANGLE_VERTEX_GLSL,
            "#version 450\nvoid main() { missing }",
        );
        let err = plan_program(&source).expect_err("fragment compile fails");
        assert!(matches!(
            err,
            PipelineError::ShaderCompile {
                kind: ShaderKind::Fragment,
                ..
            }
        ));
    }
}
