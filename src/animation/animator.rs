//! Animator: the per-frame playback context handed down the node tree.
//!
//! [`AnimatorState`] holds the validated evaluation parameters. The
//! [`Animator`] trait adds playback operations on top of it, and
//! [`ActorAnimator`] binds those operations to one actor through the
//! [`ActionTarget`] playback interface.

use std::sync::Arc;

use crate::animation::clip::AnimationClip;
use crate::errors::{AnimGraphError, Result};

/// How a layer plays its frame range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum PlayMode {
    /// Play once and stop at the end frame.
    #[default]
    Play,
    /// Wrap back to the start frame.
    Loop,
    /// Reverse direction at either end.
    PingPong,
}

/// How a layer combines with the layers below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum BlendMode {
    /// Interpolate towards this layer by its weight.
    #[default]
    Blend,
    /// Add this layer, scaled by its weight.
    Add,
}

/// Validated evaluation parameters.
///
/// Every setter checks its argument and returns an error instead of
/// clamping, so a state is never observably out of range.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatorState {
    time_delta: f32,
    layer: u32,
    weight: f32,
    speed: f32,
    priority: u32,
    blend: f32,
    play_mode: PlayMode,
    blend_mode: BlendMode,
    root_bone: Option<String>,
}

/// The subset of [`AnimatorState`] a blend node overrides while descending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateScope {
    pub layer: u32,
    pub weight: f32,
    pub play_mode: PlayMode,
    pub blend_mode: BlendMode,
}

impl Default for AnimatorState {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AnimatorState {
    /// Creates a state with default parameters. `root_bone` cannot be
    /// changed afterwards.
    #[must_use]
    pub fn new(root_bone: Option<String>) -> Self {
        Self {
            time_delta: 0.0,
            layer: 0,
            weight: 1.0,
            speed: 1.0,
            priority: 0,
            blend: 0.0,
            play_mode: PlayMode::Play,
            blend_mode: BlendMode::Blend,
            root_bone,
        }
    }

    /// Seconds elapsed since the previous evaluation.
    #[inline]
    #[must_use]
    pub fn time_delta(&self) -> f32 {
        self.time_delta
    }

    pub fn set_time_delta(&mut self, value: f32) -> Result<()> {
        if !(value.is_finite() && value >= 0.0) {
            return Err(AnimGraphError::invalid("time_delta", value, "a finite value >= 0"));
        }
        self.time_delta = value;
        Ok(())
    }

    /// Playback slot requests are issued on.
    #[inline]
    #[must_use]
    pub fn layer(&self) -> u32 {
        self.layer
    }

    pub fn set_layer(&mut self, value: u32) {
        self.layer = value;
    }

    #[inline]
    #[must_use]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn set_weight(&mut self, value: f32) -> Result<()> {
        self.weight = unit_interval("weight", value)?;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, value: f32) {
        self.speed = value;
    }

    #[inline]
    #[must_use]
    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn set_priority(&mut self, value: u32) {
        self.priority = value;
    }

    /// Blend-in amount in `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn blend(&self) -> f32 {
        self.blend
    }

    pub fn set_blend(&mut self, value: f32) -> Result<()> {
        self.blend = unit_interval("blend", value)?;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    pub fn set_play_mode(&mut self, value: PlayMode) {
        self.play_mode = value;
    }

    #[inline]
    #[must_use]
    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn set_blend_mode(&mut self, value: BlendMode) {
        self.blend_mode = value;
    }

    /// Bone whose positional channels carry root motion.
    #[inline]
    #[must_use]
    pub fn root_bone(&self) -> Option<&str> {
        self.root_bone.as_deref()
    }

    /// Captures the values a blend node overrides.
    #[must_use]
    pub fn scope(&self) -> StateScope {
        StateScope {
            layer: self.layer,
            weight: self.weight,
            play_mode: self.play_mode,
            blend_mode: self.blend_mode,
        }
    }

    /// Puts back values captured by [`scope`](Self::scope).
    pub fn restore(&mut self, scope: StateScope) {
        self.layer = scope.layer;
        self.weight = scope.weight;
        self.play_mode = scope.play_mode;
        self.blend_mode = scope.blend_mode;
    }
}

fn unit_interval(name: &'static str, value: f32) -> Result<f32> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(AnimGraphError::invalid(name, value, "a value in [0, 1]"))
    }
}

/// Abstract playback context.
///
/// Nodes read and adjust the [`AnimatorState`] while descending the tree and
/// issue playback requests on the current layer.
pub trait Animator {
    fn state(&self) -> &AnimatorState;

    fn state_mut(&mut self) -> &mut AnimatorState;

    /// Frames per second used to convert `time_delta` into frames.
    fn fps(&self) -> f32;

    /// Plays `clip` on the current layer from `start_frame` (default 0) to
    /// `end_frame` (default: the clip's last frame).
    fn play(&mut self, clip: &Arc<AnimationClip>, start_frame: Option<f32>, end_frame: Option<f32>);

    /// Halts playback on the current layer.
    fn stop(&mut self);

    /// Clip playing on the current layer.
    fn action(&self) -> Option<Arc<AnimationClip>>;

    fn frame(&self) -> f32;

    fn set_frame(&mut self, frame: f32);

    fn playing(&self) -> bool;
}

/// A fully resolved request to play a clip on one layer.
#[derive(Debug, Clone)]
pub struct PlayRequest {
    pub clip: Arc<AnimationClip>,
    pub start_frame: f32,
    pub end_frame: f32,
    pub layer: u32,
    pub priority: u32,
    /// Frames over which the layer weight ramps in.
    pub blend_in: f32,
    pub play_mode: PlayMode,
    pub layer_weight: f32,
    pub speed: f32,
    pub blend_mode: BlendMode,
}

/// Layered clip playback on a skeletal actor.
///
/// This is the seam to the scene: the animation graph only issues requests
/// and queries through it.
pub trait ActionTarget {
    fn play_action(&mut self, request: PlayRequest);

    fn stop_action(&mut self, layer: u32);

    fn action(&self, layer: u32) -> Option<Arc<AnimationClip>>;

    fn action_frame(&self, layer: u32) -> f32;

    fn set_action_frame(&mut self, layer: u32, frame: f32);

    fn is_playing_action(&self, layer: u32) -> bool;
}

/// An [`Animator`] bound to exactly one actor.
#[derive(Debug)]
pub struct ActorAnimator<T: ActionTarget> {
    target: T,
    state: AnimatorState,
    fps: f32,
}

impl<T: ActionTarget> ActorAnimator<T> {
    pub fn new(target: T, fps: f32, root_bone: Option<String>) -> Result<Self> {
        if !(fps.is_finite() && fps > 0.0) {
            return Err(AnimGraphError::invalid("fps", fps, "a finite value > 0"));
        }
        Ok(Self {
            target,
            state: AnimatorState::new(root_bone),
            fps,
        })
    }

    #[must_use]
    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    #[must_use]
    pub fn into_target(self) -> T {
        self.target
    }
}

impl<T: ActionTarget> Animator for ActorAnimator<T> {
    fn state(&self) -> &AnimatorState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AnimatorState {
        &mut self.state
    }

    fn fps(&self) -> f32 {
        self.fps
    }

    fn play(&mut self, clip: &Arc<AnimationClip>, start_frame: Option<f32>, end_frame: Option<f32>) {
        let state = &self.state;
        let request = PlayRequest {
            clip: Arc::clone(clip),
            start_frame: start_frame.unwrap_or(0.0),
            end_frame: end_frame.unwrap_or_else(|| clip.duration_in_frames()),
            layer: state.layer,
            priority: state.priority,
            blend_in: state.blend,
            play_mode: state.play_mode,
            layer_weight: state.weight,
            speed: state.speed,
            blend_mode: state.blend_mode,
        };
        self.target.play_action(request);
    }

    fn stop(&mut self) {
        self.target.stop_action(self.state.layer);
    }

    fn action(&self) -> Option<Arc<AnimationClip>> {
        self.target.action(self.state.layer)
    }

    fn frame(&self) -> f32 {
        self.target.action_frame(self.state.layer)
    }

    fn set_frame(&mut self, frame: f32) {
        self.target.set_action_frame(self.state.layer, frame);
    }

    fn playing(&self) -> bool {
        self.target.is_playing_action(self.state.layer)
    }
}
