use std::fmt;
use std::sync::Arc;

use glam::Vec3;
use slotmap::{SecondaryMap, SlotMap, new_key_type};

use crate::animation::{AnimationClip, AnimationResult, Animator};
use crate::errors::Result;
use crate::nodetree::action::PlayActionNode;
use crate::nodetree::mix::MixAnimationNode;
use crate::nodetree::output::AnimationOutputNode;
use crate::nodetree::socket::{SocketSpec, SocketType};

new_key_type! {
    /// Stable identity of a node.
    ///
    /// Per-node runtime state is keyed by this id, so it survives any
    /// re-creation of the authoring-side objects that refer to the node.
    pub struct NodeId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    PlayAction,
    Mix,
    Output,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::PlayAction => "Play Action",
            NodeKind::Mix => "Mix",
            NodeKind::Output => "Animation Output",
        })
    }
}

/// Authored data of a node in an animation tree.
#[derive(Debug, Clone)]
pub enum AnimationNode {
    PlayAction(PlayActionNode),
    Mix(MixAnimationNode),
    Output(AnimationOutputNode),
}

impl AnimationNode {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            AnimationNode::PlayAction(_) => NodeKind::PlayAction,
            AnimationNode::Mix(_) => NodeKind::Mix,
            AnimationNode::Output(_) => NodeKind::Output,
        }
    }

    /// Input sockets, in socket-index order.
    #[must_use]
    pub fn inputs(&self) -> &'static [SocketSpec] {
        match self {
            AnimationNode::PlayAction(_) => PlayActionNode::INPUTS,
            AnimationNode::Mix(_) => MixAnimationNode::INPUTS,
            AnimationNode::Output(_) => AnimationOutputNode::INPUTS,
        }
    }

    /// Type of the output socket, if the node has one.
    #[must_use]
    pub fn output(&self) -> Option<SocketType> {
        match self {
            AnimationNode::Output(_) => None,
            _ => Some(SocketType::Animation),
        }
    }

    /// Whether the node can evaluate with the given resolved animation inputs.
    pub(crate) fn accepts(&self, inputs: &[Option<NodeId>; 2]) -> bool {
        match self {
            AnimationNode::PlayAction(_) => true,
            AnimationNode::Mix(_) => inputs.iter().all(Option::is_some),
            AnimationNode::Output(_) => inputs[0].is_some(),
        }
    }
}

impl From<PlayActionNode> for AnimationNode {
    fn from(node: PlayActionNode) -> Self {
        AnimationNode::PlayAction(node)
    }
}

impl From<MixAnimationNode> for AnimationNode {
    fn from(node: MixAnimationNode) -> Self {
        AnimationNode::Mix(node)
    }
}

impl From<AnimationOutputNode> for AnimationNode {
    fn from(node: AnimationOutputNode) -> Self {
        AnimationNode::Output(node)
    }
}

/// Runtime state of a node, owned by the tree and keyed by [`NodeId`].
#[derive(Debug, Clone, Default)]
pub struct NodeState {
    pub(crate) valid: bool,
    /// Resolved animation inputs, in socket order. Set by validation only.
    pub(crate) inputs: [Option<NodeId>; 2],
    pub(crate) last_frame: f32,
    pub(crate) root_position: Vec3,
    pub(crate) result: AnimationResult,
    /// Clip the play head belongs to.
    pub(crate) clip: Option<Arc<AnimationClip>>,
}

impl NodeState {
    #[inline]
    #[must_use]
    pub fn valid(&self) -> bool {
        self.valid
    }

    #[inline]
    #[must_use]
    pub fn inputs(&self) -> [Option<NodeId>; 2] {
        self.inputs
    }

    /// Frame the next evaluation of a play action node starts from.
    #[inline]
    #[must_use]
    pub fn last_frame(&self) -> f32 {
        self.last_frame
    }

    /// Root bone location recorded by the previous evaluation.
    #[inline]
    #[must_use]
    pub fn root_position(&self) -> Vec3 {
        self.root_position
    }

    /// The result buffer the node refills on every evaluation.
    #[inline]
    #[must_use]
    pub fn result(&self) -> &AnimationResult {
        &self.result
    }
}

/// Borrowed view of a tree used for one evaluation pass.
pub(crate) struct EvalContext<'a> {
    pub(crate) nodes: &'a SlotMap<NodeId, AnimationNode>,
    pub(crate) states: &'a mut SecondaryMap<NodeId, NodeState>,
}

impl EvalContext<'_> {
    pub(crate) fn depth(&self, id: NodeId) -> u32 {
        depth_of(self.nodes, self.states, id)
    }

    pub(crate) fn advance(&mut self, id: NodeId, animator: &mut dyn Animator) -> Result<Option<AnimationResult>> {
        let nodes = self.nodes;
        let Some(node) = nodes.get(id) else {
            return Ok(None);
        };
        match node {
            AnimationNode::PlayAction(action) => match self.states.get_mut(id) {
                Some(state) => action.advance(state, animator),
                None => Ok(None),
            },
            AnimationNode::Mix(mix) => mix.advance(id, self, animator),
            AnimationNode::Output(output) => output.advance(id, self, animator),
        }
    }
}

/// Number of playback layers the subtree rooted at `id` occupies.
///
/// Follows resolved inputs only, which validation keeps acyclic.
pub(crate) fn depth_of(
    nodes: &SlotMap<NodeId, AnimationNode>,
    states: &SecondaryMap<NodeId, NodeState>,
    id: NodeId,
) -> u32 {
    let inputs = states.get(id).map(|s| s.inputs).unwrap_or_default();
    let input_depth = |input: Option<NodeId>| input.map_or(0, |input| depth_of(nodes, states, input));

    match nodes.get(id) {
        Some(AnimationNode::PlayAction(_)) => PlayActionNode::DEPTH,
        Some(AnimationNode::Mix(_)) => input_depth(inputs[0]) + input_depth(inputs[1]),
        Some(AnimationNode::Output(_)) => input_depth(inputs[0]),
        None => 0,
    }
}
