use std::time::{Duration, Instant};

/// High-level behaviour requested by the caller.
///
/// The render policy decides whether frames animate continuously or are
/// evaluated once at a fixed timestamp and then held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderPolicy {
    /// Run the render loop continuously, optionally clamping the frame
    /// rate.
    Animate {
        /// Optional requested frames-per-second cap.
        target_fps: Option<f32>,
    },
    /// Render a single frame at an optional timestamp (seconds).
    Still {
        /// Specific timestamp to evaluate the rotation at.
        time: Option<f64>,
    },
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Animate { target_fps: None }
    }
}

/// Snapshot of the time state a frame is planned against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed wall-clock or simulated time in milliseconds.
    pub elapsed_ms: f64,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

impl TimeSample {
    pub fn new(elapsed_ms: f64, frame_index: u64) -> Self {
        Self {
            elapsed_ms,
            frame_index,
        }
    }
}

/// Abstraction over where frame timestamps originate from.
pub trait FrameClock: Send {
    /// Resets the clock to its initial state.
    fn reset(&mut self);
    /// Produces the time sample for the next frame.
    fn sample(&mut self) -> TimeSample;
}

/// Clock backed by the system monotonic timer, measuring from the
/// moment it was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
    frame: u64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}

impl FrameClock for SystemClock {
    fn reset(&mut self) {
        self.origin = Instant::now();
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let elapsed = self.origin.elapsed();
        let sample = TimeSample::new(elapsed.as_secs_f64() * 1000.0, self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Clock that always reports the same timestamp, used for still frames.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    elapsed_ms: f64,
}

impl FixedClock {
    pub fn new(elapsed_ms: f64) -> Self {
        Self { elapsed_ms }
    }
}

impl FrameClock for FixedClock {
    fn reset(&mut self) {}

    fn sample(&mut self) -> TimeSample {
        TimeSample::new(self.elapsed_ms, 0)
    }
}

/// Convenient alias for owning clocks behind trait objects.
pub type BoxedFrameClock = Box<dyn FrameClock + Send>;

/// Builds a clock suited to the requested render policy.
pub fn clock_for_policy(policy: &RenderPolicy) -> BoxedFrameClock {
    match policy {
        RenderPolicy::Animate { .. } => Box::new(SystemClock::new()),
        RenderPolicy::Still { time } => Box::new(FixedClock::new(time.unwrap_or(0.0) * 1000.0)),
    }
}

/// Decides when the event loop should issue the next redraw.
///
/// Animated scenes under an [`RenderPolicy::Animate`] policy redraw
/// continuously, optionally throttled to a frame interval. Everything
/// else renders once and then only reacts to window-system redraw
/// requests such as expose or resize.
#[derive(Debug)]
pub struct FrameScheduler {
    continuous: bool,
    interval: Option<Duration>,
    next_deadline: Option<Instant>,
    rendered: bool,
}

impl FrameScheduler {
    pub fn new(policy: &RenderPolicy, scene_animates: bool) -> Self {
        let continuous = scene_animates && matches!(policy, RenderPolicy::Animate { .. });
        let interval = match policy {
            RenderPolicy::Animate {
                target_fps: Some(fps),
            } if continuous && fps.is_finite() && *fps > 0.0 => {
                Some(Duration::from_secs_f32(fps.recip()))
            }
            _ => None,
        };
        Self {
            continuous,
            interval,
            next_deadline: None,
            rendered: false,
        }
    }

    /// Whether a new frame should be requested at `now`.
    pub fn ready_for_frame(&self, now: Instant) -> bool {
        if !self.continuous {
            return !self.rendered;
        }
        match self.next_deadline {
            Some(deadline) => now >= deadline,
            None => true,
        }
    }

    /// Records a presented frame and arms the next frame-rate deadline.
    pub fn mark_rendered(&mut self, now: Instant) {
        self.rendered = true;
        if let Some(interval) = self.interval {
            self.next_deadline = Some(now + interval);
        }
    }

    /// Deadline the event loop should sleep until when throttled.
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.continuous {
            self.next_deadline
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.next_deadline = None;
        self.rendered = false;
    }
}
