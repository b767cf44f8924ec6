use std::sync::Arc;

use glam::Vec3;

use crate::animation::{AnimationClip, AnimationResult, Animator, PlayMode};
use crate::errors::Result;
use crate::nodetree::node::NodeState;
use crate::nodetree::socket::SocketSpec;

/// Leaf node that plays a single clip.
///
/// The node tracks its own play head (`last_frame` in its [`NodeState`]) and
/// requests exactly the frame range covered by the current time step. It
/// wraps itself when the clip runs out, so the playback layer is always
/// driven in [`PlayMode::Play`]: the engine's native looping would move the
/// play head behind the node's back.
#[derive(Debug, Clone, Default)]
pub struct PlayActionNode {
    clip: Option<Arc<AnimationClip>>,
}

impl PlayActionNode {
    pub(crate) const INPUTS: &'static [SocketSpec] = &[];

    /// A play action node always occupies one layer.
    pub const DEPTH: u32 = 1;

    #[must_use]
    pub fn new(clip: Option<Arc<AnimationClip>>) -> Self {
        Self { clip }
    }

    #[must_use]
    pub fn with_clip(clip: Arc<AnimationClip>) -> Self {
        Self::new(Some(clip))
    }

    #[must_use]
    pub fn clip(&self) -> Option<&Arc<AnimationClip>> {
        self.clip.as_ref()
    }

    /// Replaces the clip. The node restarts from frame 0 on its next
    /// evaluation.
    pub fn set_clip(&mut self, clip: Option<Arc<AnimationClip>>) {
        self.clip = clip;
    }

    pub(crate) fn advance(&self, state: &mut NodeState, animator: &mut dyn Animator) -> Result<Option<AnimationResult>> {
        let Some(clip) = &self.clip else {
            return Ok(None);
        };

        if !state.clip.as_ref().is_some_and(|seen| Arc::ptr_eq(seen, clip)) {
            // A new clip starts from its first frame.
            state.clip = Some(Arc::clone(clip));
            state.last_frame = 0.0;
            state.root_position = Vec3::ZERO;
        }

        let (start_frame, end_frame, wrapped) = step_frames(
            state.last_frame,
            animator.state().time_delta() * animator.fps(),
            clip.duration_in_frames(),
        );

        let root = animator
            .state()
            .root_bone()
            .and_then(|bone| clip.sample_translation(bone, start_frame));

        // Nothing is committed until the offset is accepted.
        let mut result = AnimationResult::ZERO;
        if let Some(position) = root {
            result.set_offset(position - state.root_position)?;
            state.root_position = if wrapped { Vec3::ZERO } else { position };
        }
        state.last_frame = if wrapped { 0.0 } else { end_frame };
        state.result = result;

        animator.state_mut().set_play_mode(PlayMode::Play);
        animator.play(clip, Some(start_frame), Some(end_frame));

        Ok(Some(state.result))
    }
}

/// Frame range covered by one step starting at `last_frame`.
///
/// Returns `(start, end, wrapped)`; `end` never exceeds `total` and
/// `wrapped` is set once the clip's last frame is reached.
#[must_use]
pub fn step_frames(last_frame: f32, frames: f32, total: f32) -> (f32, f32, bool) {
    let start = last_frame;
    let end = (start + frames).min(total);
    (start, end, end >= total)
}
