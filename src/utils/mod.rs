//! Utility Module
//!
//! - [`time`]: time sources and the per-frame [`Scheduler`]

pub mod time;

pub use time::{FrameClock, FrameDriven, ManualClock, RealClock, Scheduler, TimeMode, TimeSource};
