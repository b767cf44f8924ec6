#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! # Myth AnimGraph
//!
//! Node-graph animation blending for a single skeletal actor.
//!
//! A tree of [`PlayActionNode`]s, [`MixAnimationNode`]s and one
//! [`AnimationOutputNode`] is evaluated once per frame by an
//! [`AnimationGraph`]. Evaluation assigns every playing clip its own layer,
//! blends by per-node mix ratios and extracts the root-motion offset, which
//! is published to consumers such as [`RootMotionLocomotion`].
//!
//! ```rust,ignore
//! use myth_animgraph::prelude::*;
//!
//! let mut tree = AnimationNodeTree::new();
//! let walk = tree.add_node("Walk", PlayActionNode::with_clip(walk_clip))?;
//! let run = tree.add_node("Run", PlayActionNode::with_clip(run_clip))?;
//! let mix = tree.add_node("Mix", MixAnimationNode::default())?;
//! let output = tree.add_node("Output", AnimationOutputNode::new())?;
//! tree.link(walk, mix, 1)?;
//! tree.link(run, mix, 2)?;
//! tree.link(mix, output, 0)?;
//!
//! let mut graph = AnimationGraph::new(tree, LayerMixer::new(24.0), AnimationGraphSettings::default())?;
//! graph.initialize()?;
//! let results = graph.on_advance();
//! ```

pub mod animation;
pub mod errors;
pub mod nodetree;
pub mod runtime;
pub mod utils;

pub use animation::{
    ActionTarget, ActorAnimator, AnimationClip, AnimationResult, Animator, AnimatorState, BlendMode, LayerMixer,
    PlayMode, PlayRequest,
};
pub use errors::{AnimGraphError, Result};
pub use nodetree::{
    AnimationNode, AnimationNodeTree, AnimationOutputNode, MixAnimationNode, NodeId, NodeKind, PlayActionNode,
};
pub use runtime::{AnimationGraph, AnimationGraphSettings, LocomotionSettings, RootMotionLocomotion};
pub use utils::time::{FrameDriven, Scheduler, TimeMode};

pub mod prelude {
    pub use crate::animation::{
        ActionTarget, ActorAnimator, AnimationClip, AnimationResult, Animator, BlendMode, KeyframeTrack, LayerMixer,
        PlayMode, Track,
    };
    pub use crate::errors::{AnimGraphError, Result};
    pub use crate::nodetree::{
        AnimationNodeTree, AnimationOutputNode, MixAnimationNode, NodeId, NodeKind, PlayActionNode,
    };
    pub use crate::runtime::{AnimationGraph, AnimationGraphSettings, LocomotionSettings, RootMotionLocomotion};
    pub use crate::utils::time::{FrameDriven, ManualClock, Scheduler, TimeMode};
}
