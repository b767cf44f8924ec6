use crate::animation::{AnimationResult, Animator};
use crate::errors::Result;
use crate::nodetree::node::{EvalContext, NodeId};
use crate::nodetree::socket::SocketSpec;

/// Root of an animation tree.
///
/// Assigns the top layer (the total depth of its input) before descending;
/// each mix node below then hands its second input the layers left under
/// its first, so every leaf plays on its own layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationOutputNode;

impl AnimationOutputNode {
    pub(crate) const INPUTS: &'static [SocketSpec] = &[SocketSpec::animation("Input")];

    #[must_use]
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn advance(
        self,
        id: NodeId,
        ctx: &mut EvalContext<'_>,
        animator: &mut dyn Animator,
    ) -> Result<Option<AnimationResult>> {
        animator.state_mut().set_layer(ctx.depth(id));

        match ctx.states.get(id).and_then(|s| s.inputs[0]) {
            Some(input) => ctx.advance(input, animator),
            None => Ok(None),
        }
    }
}
