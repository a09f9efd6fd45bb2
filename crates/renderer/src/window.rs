use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use scene::Scene;

use crate::frame::plan_frame;
use crate::gpu::GpuState;
use crate::runtime::{clock_for_policy, BoxedFrameClock, FrameScheduler, RenderPolicy, TimeSample};
use crate::types::RendererConfig;

/// Aggregates GPU state for the windowed path.
pub(crate) struct WindowState {
    window: Arc<Window>,
    gpu: GpuState,
}

impl WindowState {
    pub(crate) fn new(window: Arc<Window>, scene: Scene) -> Result<Self> {
        let size = window.inner_size();
        let gpu = GpuState::new(window.as_ref(), size, scene)?;
        Ok(Self { window, gpu })
    }

    pub(crate) fn window(&self) -> &Window {
        self.window.as_ref()
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.gpu.size()
    }

    pub(crate) fn scene_animates(&self) -> bool {
        self.gpu.scene().animates()
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }

    pub(crate) fn render_frame(&mut self, sample: TimeSample) -> Result<(), wgpu::SurfaceError> {
        let plan = plan_frame(self.gpu.scene(), sample);
        self.gpu.render(&plan)
    }
}

/// Couples the frame clock with the scheduler so the event loop has a
/// single place to ask about timing.
pub(crate) struct RenderPolicyDriver {
    scheduler: FrameScheduler,
    clock: BoxedFrameClock,
}

impl RenderPolicyDriver {
    pub(crate) fn new(policy: &RenderPolicy, scene_animates: bool) -> Self {
        Self {
            scheduler: FrameScheduler::new(policy, scene_animates),
            clock: clock_for_policy(policy),
        }
    }

    pub(crate) fn sample(&mut self) -> TimeSample {
        self.clock.sample()
    }

    pub(crate) fn mark_rendered(&mut self) {
        self.scheduler.mark_rendered(Instant::now());
    }

    pub(crate) fn ready_for_frame(&self, now: Instant) -> bool {
        self.scheduler.ready_for_frame(now)
    }

    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }
}

pub(crate) fn run_windowed(config: &RendererConfig, scene: Scene) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(config.window_title.clone())
        .with_inner_size(window_size)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create scene window: {err}"))?;
    let window = Arc::new(window);

    let mut state =
        WindowState::new(window.clone(), scene).context("failed to initialise window renderer")?;

    let mut driver = RenderPolicyDriver::new(&config.policy, state.scene_animates());
    tracing::info!(
        width = window_size.width,
        height = window_size.height,
        animated = state.scene_animates(),
        "opening scene window"
    );
    if driver.ready_for_frame(Instant::now()) {
        state.window().request_redraw();
    }

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
                    WindowEvent::Resized(new_size) => state.resize(new_size),
                    WindowEvent::ScaleFactorChanged {
                        mut inner_size_writer,
                        ..
                    } => {
                        let _ = inner_size_writer.request_inner_size(state.size());
                    }
                    WindowEvent::RedrawRequested => match state.render_frame(driver.sample()) {
                        Ok(()) => driver.mark_rendered(),
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            state.resize(state.size());
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            eprintln!("surface out of memory; exiting");
                            elwt.exit();
                        }
                        Err(wgpu::SurfaceError::Timeout) => {
                            eprintln!("surface timeout; retrying next frame");
                        }
                        Err(other) => {
                            eprintln!("surface error: {other:?}; retrying next frame");
                        }
                    },
                    _ => {}
                }
            }
            Event::AboutToWait => {
                let now = Instant::now();
                if driver.ready_for_frame(now) {
                    tracing::trace!("scheduler: issuing redraw now");
                    state.window().request_redraw();
                    elwt.set_control_flow(ControlFlow::Wait);
                } else if let Some(deadline) = driver.next_deadline() {
                    let ms = deadline.saturating_duration_since(now).as_millis();
                    tracing::trace!(deadline_ms = ms, "scheduler: waiting until next frame");
                    elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
                } else {
                    tracing::trace!("scheduler: idle (no redraw requested)");
                    elwt.set_control_flow(ControlFlow::Wait);
                }
            }
            _ => {}
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))
}
