//! Shared test doubles and clip builders.

#![allow(dead_code)]

use std::sync::Arc;

use glam::Vec3;
use rustc_hash::FxHashMap;

use myth_animgraph::animation::{
    ActionTarget, AnimationClip, InterpolationMode, KeyframeTrack, PlayRequest, Track,
};

pub const ROOT: &str = "Root";
pub const EPSILON: f32 = 1e-4;

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

pub fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An [`ActionTarget`] that records every request and keeps the latest one
/// per layer.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pub requests: Vec<PlayRequest>,
    pub stopped: Vec<u32>,
    current: FxHashMap<u32, PlayRequest>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests issued for `clip`, in order.
    pub fn requests_for(&self, clip: &str) -> Vec<&PlayRequest> {
        self.requests.iter().filter(|r| r.clip.name == clip).collect()
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }
}

impl ActionTarget for RecordingTarget {
    fn play_action(&mut self, request: PlayRequest) {
        self.current.insert(request.layer, request.clone());
        self.requests.push(request);
    }

    fn stop_action(&mut self, layer: u32) {
        self.current.remove(&layer);
        self.stopped.push(layer);
    }

    fn action(&self, layer: u32) -> Option<Arc<AnimationClip>> {
        self.current.get(&layer).map(|r| Arc::clone(&r.clip))
    }

    fn action_frame(&self, layer: u32) -> f32 {
        self.current.get(&layer).map_or(0.0, |r| r.start_frame)
    }

    fn set_action_frame(&mut self, layer: u32, frame: f32) {
        if let Some(request) = self.current.get_mut(&layer) {
            request.start_frame = frame;
        }
    }

    fn is_playing_action(&self, layer: u32) -> bool {
        self.current.contains_key(&layer)
    }
}

/// A clip whose root bone moves linearly by `velocity` per frame over
/// `frames` frames.
pub fn moving_clip(name: &str, frames: f32, velocity: Vec3) -> Arc<AnimationClip> {
    let track = KeyframeTrack::new(
        vec![0.0, frames],
        vec![Vec3::ZERO, velocity * frames],
        InterpolationMode::Linear,
    )
    .unwrap();
    Arc::new(AnimationClip::new(name, vec![Track::translation(ROOT, track)]))
}

/// A clip of `frames` frames that animates no bones.
pub fn still_clip(name: &str, frames: f32) -> Arc<AnimationClip> {
    Arc::new(AnimationClip::with_length(name, frames, Vec::new()))
}

/// A `frames`-long clip whose root bone sits at the origin up to frame 30
/// and holds a non-finite location from there on.
pub fn broken_clip(name: &str, frames: f32) -> Arc<AnimationClip> {
    let track = KeyframeTrack::new(vec![0.0, 30.0], vec![Vec3::ZERO, Vec3::NAN], InterpolationMode::Step).unwrap();
    Arc::new(AnimationClip::with_length(name, frames, vec![Track::translation(ROOT, track)]))
}
