//! Runtime Module
//!
//! Per-frame driving of an authored tree:
//!
//! - [`AnimationGraph`]: evaluates a tree for one actor on every tick and
//!   publishes the results
//! - [`RootMotionLocomotion`]: turns published root motion into actor
//!   displacement and steers a mix node from movement input
//! - [`AnimationGraphSettings`] / [`LocomotionSettings`]: serde configuration

pub mod graph;
pub mod locomotion;
pub mod settings;

pub use graph::{AnimationGraph, ErrorHandler, GraphStatus};
pub use locomotion::RootMotionLocomotion;
pub use settings::{AnimationGraphSettings, DEFAULT_FPS, DEFAULT_MIXER_NODE, LocomotionSettings};
