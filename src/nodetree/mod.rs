//! Node Tree Module
//!
//! The authored blend tree and its evaluation:
//!
//! - [`PlayActionNode`]: leaf that plays one clip and extracts root motion
//! - [`MixAnimationNode`]: binary blend of two subtrees
//! - [`AnimationOutputNode`]: the single root of a tree
//! - [`AnimationNodeTree`]: owns nodes, links and per-node state, keyed by
//!   stable [`NodeId`]s
//!
//! Evaluation walks from the output node down. Each subtree is assigned a
//! contiguous range of playback layers sized by its depth, so no two leaves
//! play on the same layer.

pub mod action;
pub mod mix;
pub mod node;
pub mod output;
pub mod socket;
pub mod tree;

pub use action::{PlayActionNode, step_frames};
pub use mix::{DEFAULT_MIX, MixAnimationNode, blend_offsets, branch_weights};
pub use node::{AnimationNode, NodeId, NodeKind, NodeState};
pub use output::AnimationOutputNode;
pub use socket::{LinkId, NodeLink, SocketSpec, SocketType};
pub use tree::AnimationNodeTree;
