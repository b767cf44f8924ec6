use std::cell::Cell;
use std::rc::Rc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::errors::{AnimGraphError, Result};

/// Monotonic time as seen by frame-driven components.
pub trait TimeSource {
    /// Time since the source's origin.
    fn now(&self) -> Duration;

    /// Called once at the start of every scheduler tick.
    fn on_frame(&mut self) {}
}

/// Wall-clock time since creation.
#[derive(Debug, Clone, Copy)]
pub struct RealClock {
    start: Instant,
}

impl Default for RealClock {
    fn default() -> Self {
        Self::new()
    }
}

impl RealClock {
    #[must_use]
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl TimeSource for RealClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Time derived from the frame count at a fixed rate.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    step: Duration,
    frames: u32,
}

impl FrameClock {
    pub fn new(fps: f32) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(AnimGraphError::invalid("fps", fps, "a positive number"));
        }
        Ok(Self {
            step: Duration::from_secs_f32(1.0 / fps),
            frames: 0,
        })
    }

    #[must_use]
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

impl TimeSource for FrameClock {
    fn now(&self) -> Duration {
        self.step * self.frames
    }

    fn on_frame(&mut self) {
        self.frames = self.frames.saturating_add(1);
    }
}

/// Time set explicitly by its owner. Clones share the same instant.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Which time base a [`Scheduler`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeMode {
    /// Frame count at a fixed rate.
    Frame,
    /// A host-owned clock, advanced through [`Scheduler::clock`].
    Clock,
    /// Wall-clock time.
    #[default]
    Real,
}

/// A component that runs once per scheduler tick.
pub trait FrameDriven {
    fn process(&mut self, now: Duration);
}

/// Per-frame tick source for animation graphs.
pub struct Scheduler {
    source: Box<dyn TimeSource>,
    clock: Option<ManualClock>,
    last_update: Option<Duration>,
    /// Time since last tick
    pub delta: Duration,
    /// Time reported by the source at the last tick
    pub elapsed: Duration,
    /// Total number of ticks
    pub frame_count: u64,
}

impl Scheduler {
    /// Creates a scheduler for `mode`. `fps` is only used by [`TimeMode::Frame`].
    pub fn new(mode: TimeMode, fps: f32) -> Result<Self> {
        let scheduler = match mode {
            TimeMode::Frame => Self::with_source(FrameClock::new(fps)?),
            TimeMode::Clock => {
                let clock = ManualClock::new();
                let mut scheduler = Self::with_source(clock.clone());
                scheduler.clock = Some(clock);
                scheduler
            }
            TimeMode::Real => Self::with_source(RealClock::new()),
        };
        Ok(scheduler)
    }

    pub fn with_source(source: impl TimeSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            clock: None,
            last_update: None,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Handle to the host-owned clock in [`TimeMode::Clock`].
    #[must_use]
    pub fn clock(&self) -> Option<&ManualClock> {
        self.clock.as_ref()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.source.now()
    }

    /// Advances one frame and returns the current time.
    pub fn tick(&mut self) -> Duration {
        self.source.on_frame();
        let now = self.source.now();

        self.delta = self
            .last_update
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.elapsed = now;
        self.last_update = Some(now);
        self.frame_count += 1;
        now
    }

    /// Ticks once and hands the time to every listener, in order.
    pub fn process(&mut self, listeners: &mut [&mut dyn FrameDriven]) -> Duration {
        let now = self.tick();
        for listener in listeners.iter_mut() {
            listener.process(now);
        }
        now
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}
