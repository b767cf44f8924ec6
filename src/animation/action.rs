use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::animator::{BlendMode, PlayMode, PlayRequest};
use crate::animation::clip::AnimationClip;
use crate::animation::tracks::KeyframeCursor;

/// One clip playing on one layer of a [`LayerMixer`](super::LayerMixer).
#[derive(Debug, Clone)]
pub struct LayerAction {
    clip: Arc<AnimationClip>,

    pub start_frame: f32,
    pub end_frame: f32,
    pub frame: f32,
    pub speed: f32,
    pub weight: f32,
    pub priority: u32,
    pub play_mode: PlayMode,
    pub blend_mode: BlendMode,
    pub playing: bool,

    blend_in: f32,
    /// Frames played since the request, for the blend-in ramp.
    elapsed: f32,
    /// Distance travelled from `start_frame` towards `end_frame`.
    travel: f32,
    /// One per clip track.
    cursors: Vec<KeyframeCursor>,
}

impl LayerAction {
    #[must_use]
    pub fn new(request: PlayRequest) -> Self {
        let cursors = vec![KeyframeCursor::default(); request.clip.tracks.len()];
        Self {
            clip: request.clip,
            start_frame: request.start_frame,
            end_frame: request.end_frame,
            frame: request.start_frame,
            speed: request.speed,
            weight: request.layer_weight,
            priority: request.priority,
            play_mode: request.play_mode,
            blend_mode: request.blend_mode,
            playing: true,
            blend_in: request.blend_in.max(0.0),
            elapsed: 0.0,
            travel: 0.0,
            cursors,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Layer weight after the blend-in ramp.
    #[must_use]
    pub fn effective_weight(&self) -> f32 {
        if self.blend_in <= 0.0 {
            self.weight
        } else {
            self.weight * (self.elapsed / self.blend_in).min(1.0)
        }
    }

    /// Location of `bone` at the play head.
    pub fn sample_translation(&mut self, bone: &str) -> Option<Vec3> {
        self.clip.sample_translation_with(bone, self.frame, &mut self.cursors)
    }

    /// Rotation of `bone` at the play head.
    pub fn sample_rotation(&mut self, bone: &str) -> Option<Quat> {
        self.clip.sample_rotation_with(bone, self.frame, &mut self.cursors)
    }

    /// Moves the play head, keeping it inside the playback range.
    pub fn set_frame(&mut self, frame: f32) {
        let span = (self.end_frame - self.start_frame).abs();
        self.travel = ((frame - self.start_frame) * self.direction()).clamp(0.0, span);
        self.frame = self.start_frame + self.travel * self.direction();
    }

    /// A reversed range plays backwards.
    fn direction(&self) -> f32 {
        if self.end_frame < self.start_frame { -1.0 } else { 1.0 }
    }

    /// Advances the play head by `frames` (before speed scaling).
    pub fn update(&mut self, frames: f32) {
        if !self.playing {
            return;
        }

        let step = frames * self.speed;
        self.elapsed += step.abs();

        let span = (self.end_frame - self.start_frame).abs();
        if span <= 0.0 {
            self.frame = self.start_frame;
            if self.play_mode == PlayMode::Play {
                self.playing = false;
            }
            return;
        }

        self.travel += step;

        let offset = match self.play_mode {
            PlayMode::Play => {
                if self.travel >= span {
                    self.travel = span;
                    self.playing = false;
                } else if self.travel < 0.0 {
                    // Reverse speed runs back past the start
                    self.travel = 0.0;
                    self.playing = false;
                }
                self.travel
            }
            PlayMode::Loop => {
                self.travel = self.travel.rem_euclid(span);
                self.travel
            }
            PlayMode::PingPong => {
                let double_span = span * 2.0;
                self.travel = self.travel.rem_euclid(double_span);
                if self.travel > span {
                    double_span - self.travel
                } else {
                    self.travel
                }
            }
        };

        self.frame = self.start_frame + offset * self.direction();
    }
}
