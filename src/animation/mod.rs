//! Animation Module
//!
//! Clip data and the playback side of the animation graph:
//!
//! - [`AnimationClip`]: bone channels keyed in frames
//! - [`AnimationResult`]: root-motion offset produced per evaluation
//! - [`Animator`] / [`ActorAnimator`]: the validated playback context nodes
//!   evaluate against
//! - [`LayerMixer`]: layered playback of clips on one skeleton

pub mod action;
pub mod animator;
pub mod clip;
pub mod mixer;
pub mod result;
pub mod tracks;
pub mod values;

pub use action::LayerAction;
pub use animator::{
    ActionTarget, ActorAnimator, Animator, AnimatorState, BlendMode, PlayMode, PlayRequest, StateScope,
};
pub use clip::{AnimationClip, TargetPath, Track, TrackData, TrackMeta};
pub use mixer::LayerMixer;
pub use result::AnimationResult;
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;
