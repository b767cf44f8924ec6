use glam::Vec3;

use crate::animation::{AnimationResult, Animator, BlendMode, StateScope};
use crate::errors::{AnimGraphError, Result};
use crate::nodetree::node::{EvalContext, NodeId};
use crate::nodetree::socket::SocketSpec;

/// Default of the "Mix" socket.
pub const DEFAULT_MIX: f32 = 1.0;

/// Binary blend of two animation inputs.
///
/// Both inputs are evaluated on every frame, whatever the mix ratio, because
/// evaluating a branch advances its play heads. Input 1 is always evaluated
/// before input 2.
#[derive(Debug, Clone)]
pub struct MixAnimationNode {
    mix: f32,
    blend_mode: BlendMode,
}

impl Default for MixAnimationNode {
    fn default() -> Self {
        Self {
            mix: DEFAULT_MIX,
            blend_mode: BlendMode::Blend,
        }
    }
}

impl MixAnimationNode {
    /// Socket 0 is the mix ratio, sockets 1 and 2 the animation inputs.
    pub(crate) const INPUTS: &'static [SocketSpec] = &[
        SocketSpec::float("Mix"),
        SocketSpec::animation("Input"),
        SocketSpec::animation("Input"),
    ];

    pub fn new(mix: f32, blend_mode: BlendMode) -> Result<Self> {
        let mut node = Self {
            blend_mode,
            ..Self::default()
        };
        node.set_mix(mix)?;
        Ok(node)
    }

    #[inline]
    #[must_use]
    pub fn mix(&self) -> f32 {
        self.mix
    }

    /// Sets the mix ratio. Values outside `[0, 1]` are rejected.
    pub fn set_mix(&mut self, value: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&value) {
            return Err(AnimGraphError::invalid("mix", value, "a value in [0, 1]"));
        }
        self.mix = value;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn set_blend_mode(&mut self, value: BlendMode) {
        self.blend_mode = value;
    }

    pub(crate) fn advance(
        &self,
        id: NodeId,
        ctx: &mut EvalContext<'_>,
        animator: &mut dyn Animator,
    ) -> Result<Option<AnimationResult>> {
        let Some([Some(input1), Some(input2)]) = ctx.states.get(id).map(|s| s.inputs) else {
            return Ok(None);
        };

        let mix = self.mix;
        let scope = animator.state().scope();
        let branches = self.advance_inputs(ctx, animator, scope, [input1, input2]);
        // Restored on the error path too.
        animator.state_mut().restore(scope);
        let (first, second) = branches?;

        let (Some(first), Some(second)) = (first, second) else {
            return Ok(None);
        };

        let Some(state) = ctx.states.get_mut(id) else {
            return Ok(None);
        };
        state.result.reset();
        state.result.set_offset(blend_offsets(first.offset(), second.offset(), mix))?;

        Ok(Some(state.result))
    }
}

impl MixAnimationNode {
    fn advance_inputs(
        &self,
        ctx: &mut EvalContext<'_>,
        animator: &mut dyn Animator,
        scope: StateScope,
        [input1, input2]: [NodeId; 2],
    ) -> Result<(Option<AnimationResult>, Option<AnimationResult>)> {
        let (weight1, weight2) = branch_weights(self.mix);

        {
            let state = animator.state_mut();
            state.set_weight(weight1)?;
            state.set_blend_mode(self.blend_mode);
        }
        let first = ctx.advance(input1, animator)?;

        // The first branch owns the top `depth(input1)` layers; the second
        // starts below them.
        let depth1 = ctx.depth(input1);
        let layer = scope
            .layer
            .checked_sub(depth1)
            .ok_or(AnimGraphError::LayerUnderflow {
                layer: scope.layer,
                depth: depth1,
            })?;
        {
            let state = animator.state_mut();
            state.restore(scope);
            state.set_layer(layer);
            state.set_weight(weight2)?;
            state.set_blend_mode(self.blend_mode);
        }
        let second = ctx.advance(input2, animator)?;

        Ok((first, second))
    }
}

/// Animator weights for `(input1, input2)` at mix ratio `mix`.
#[inline]
#[must_use]
pub fn branch_weights(mix: f32) -> (f32, f32) {
    (mix, 1.0 - mix)
}

/// Root-motion offset of a mix node.
///
/// The interpolation ratio is the complement of the weight input 1 is
/// played with: at `mix = 0.3` input 1 plays at weight 0.3 and contributes
/// 70% of the offset.
#[inline]
#[must_use]
pub fn blend_offsets(offset1: Vec3, offset2: Vec3, mix: f32) -> Vec3 {
    offset1 * (1.0 - mix) + offset2 * mix
}
