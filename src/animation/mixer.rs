use std::collections::BTreeMap;
use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::action::LayerAction;
use crate::animation::animator::{ActionTarget, BlendMode, PlayRequest};
use crate::animation::clip::AnimationClip;

/// Layered clip playback for one skeleton.
///
/// Each layer holds at most one [`LayerAction`]. Poses are combined from the
/// lowest layer upwards according to each layer's [`BlendMode`] and weight.
#[derive(Debug)]
pub struct LayerMixer {
    fps: f32,
    layers: BTreeMap<u32, LayerAction>,
}

impl LayerMixer {
    #[must_use]
    pub fn new(fps: f32) -> Self {
        Self {
            fps,
            layers: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn layer(&self, layer: u32) -> Option<&LayerAction> {
        self.layers.get(&layer)
    }

    /// Layers that currently hold an action, lowest first.
    pub fn layers(&self) -> impl Iterator<Item = (u32, &LayerAction)> {
        self.layers.iter().map(|(&layer, action)| (layer, action))
    }

    /// Advances every playing layer by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let frames = dt * self.fps;
        for action in self.layers.values_mut() {
            action.update(frames);
        }
    }

    /// Blended location of `bone` across all layers that animate it.
    #[must_use]
    pub fn sample_translation(&mut self, bone: &str) -> Option<Vec3> {
        self.combine(
            |action| action.sample_translation(bone),
            |below, value, weight, mode| match mode {
                BlendMode::Blend => below.lerp(value, weight),
                BlendMode::Add => below + value * weight,
            },
        )
    }

    /// Blended rotation of `bone` across all layers that animate it.
    #[must_use]
    pub fn sample_rotation(&mut self, bone: &str) -> Option<Quat> {
        self.combine(
            |action| action.sample_rotation(bone),
            |below, value, weight, mode| match mode {
                BlendMode::Blend => below.slerp(value, weight),
                BlendMode::Add => (Quat::IDENTITY.slerp(value, weight) * below).normalize(),
            },
        )
    }

    /// Each layer samples through its own keyframe cursors.
    fn combine<T: Copy>(
        &mut self,
        mut sample: impl FnMut(&mut LayerAction) -> Option<T>,
        apply: impl Fn(T, T, f32, BlendMode) -> T,
    ) -> Option<T> {
        self.layers.values_mut().fold(None, |below, action| {
            let Some(value) = sample(action) else {
                return below;
            };
            // The lowest contributing layer is the base pose
            Some(match below {
                None => value,
                Some(below) => apply(below, value, action.effective_weight(), action.blend_mode),
            })
        })
    }
}

impl ActionTarget for LayerMixer {
    fn play_action(&mut self, request: PlayRequest) {
        if let Some(current) = self.layers.get(&request.layer)
            && current.playing
            && current.priority < request.priority
        {
            log::trace!(
                "Layer {} keeps '{}' (priority {} over {}).",
                request.layer,
                current.clip().name,
                current.priority,
                request.priority
            );
            return;
        }
        self.layers.insert(request.layer, LayerAction::new(request));
    }

    fn stop_action(&mut self, layer: u32) {
        self.layers.remove(&layer);
    }

    fn action(&self, layer: u32) -> Option<Arc<AnimationClip>> {
        self.layers.get(&layer).map(|action| Arc::clone(action.clip()))
    }

    fn action_frame(&self, layer: u32) -> f32 {
        self.layers.get(&layer).map_or(0.0, |action| action.frame)
    }

    fn set_action_frame(&mut self, layer: u32, frame: f32) {
        if let Some(action) = self.layers.get_mut(&layer) {
            action.set_frame(frame);
        }
    }

    fn is_playing_action(&self, layer: u32) -> bool {
        self.layers.get(&layer).is_some_and(|action| action.playing)
    }
}
