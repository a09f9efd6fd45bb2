use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, warn};
use winit::dpi::PhysicalSize;

use scene::Scene;

use crate::error::PipelineError;
use crate::frame::FramePlan;
use crate::transform::TransformUniforms;

use super::context::GpuContext;
use super::geometry::GeometryBinding;
use super::pipeline::{plan_program, LinkedProgram, TransformSlot};

/// Owns the GPU context plus everything built from the scene: the
/// linked pipeline, the uploaded geometry, and the transform uniform.
/// Construction aborts on the first failure; the render loop only ever
/// receives a fully built state.
pub(crate) struct GpuState {
    context: GpuContext,
    scene: Scene,
    program: Option<ProgramState>,
}

struct ProgramState {
    linked: LinkedProgram,
    geometry: GeometryBinding,
    transform: Option<TransformState>,
}

struct TransformState {
    group: u32,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl TransformState {
    fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        slot: TransformSlot,
    ) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("transform buffer"),
            size: std::mem::size_of::<TransformUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("transform bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: slot.binding,
                resource: buffer.as_entire_binding(),
            }],
        });
        // Static shaders that still declare the block never receive
        // per-frame writes, so seed the buffer with identity.
        Self::write(queue, &buffer, &TransformUniforms::identity());
        Self {
            group: slot.group,
            buffer,
            bind_group,
        }
    }

    fn write(queue: &wgpu::Queue, buffer: &wgpu::Buffer, uniforms: &TransformUniforms) {
        queue.write_buffer(buffer, 0, bytemuck::bytes_of(uniforms));
    }
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        mut scene: Scene,
    ) -> Result<Self, PipelineError>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size)?;

        let program = match scene.model.as_ref() {
            None => None,
            Some(model) => {
                let interface = plan_program(&model.shader)?;
                if model.velocity.is_some() && interface.transform.is_none() {
                    warn!(
                        scene = %scene.name,
                        "vertex shader exposes no '{}' uniform; rotation disabled",
                        scene::TRANSFORM_UNIFORM
                    );
                }
                let geometry = GeometryBinding::new(&context.device, &model.geometry, &interface)?;
                let linked = LinkedProgram::new(
                    &context.device,
                    &model.shader,
                    &interface,
                    &geometry,
                    context.surface_format,
                )?;
                let transform = match (linked.uniform_layout.as_ref(), interface.transform) {
                    (Some(layout), Some(slot)) => Some(TransformState::new(
                        &context.device,
                        &context.queue,
                        layout,
                        slot,
                    )),
                    _ => None,
                };
                debug!(
                    scene = %scene.name,
                    vertices = model.geometry.vertex_count(),
                    has_transform = transform.is_some(),
                    "scene pipeline ready"
                );
                Some(ProgramState {
                    linked,
                    geometry,
                    transform,
                })
            }
        };

        // A shader without the uniform cannot rotate no matter what the
        // scene asks for; drop the velocity so the scheduler stops
        // requesting frames that would all look the same.
        if let Some(model) = scene.model.as_mut() {
            let has_transform = program
                .as_ref()
                .is_some_and(|program| program.transform.is_some());
            if !has_transform {
                model.velocity = None;
            }
        }

        Ok(Self {
            context,
            scene,
            program,
        })
    }

    pub(crate) fn scene(&self) -> &Scene {
        &self.scene
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    pub(crate) fn render(&mut self, plan: &FramePlan) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Queued before the encoder is submitted, so the draw below
        // always samples this frame's matrix.
        if let (Some(program), Some(draw)) = (self.program.as_ref(), plan.draw.as_ref()) {
            if let (Some(state), Some(uniforms)) =
                (program.transform.as_ref(), draw.transform.as_ref())
            {
                TransformState::write(&self.context.queue, &state.buffer, uniforms);
            }
        }

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("scene encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(plan.clear_color)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let (Some(program), Some(draw)) = (self.program.as_ref(), plan.draw.as_ref()) {
                render_pass.set_pipeline(&program.linked.pipeline);
                if let Some(transform) = program.transform.as_ref() {
                    render_pass.set_bind_group(transform.group, &transform.bind_group, &[]);
                }
                render_pass.set_vertex_buffer(0, program.geometry.buffer.slice(..));
                render_pass.draw(0..draw.vertex_count, 0..1);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn clear_color(color: [f64; 4]) -> wgpu::Color {
    wgpu::Color {
        r: color[0],
        g: color[1],
        b: color[2],
        a: color[3],
    }
}
