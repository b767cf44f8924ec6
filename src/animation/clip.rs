use glam::{Quat, Vec3};

use crate::animation::tracks::{KeyframeCursor, KeyframeTrack};

/// The transform channel a track animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    /// Bone location (the three positional channels)
    Translation,
    /// Bone rotation
    Rotation,
}

#[derive(Debug, Clone)]
pub struct TrackMeta {
    pub bone_name: String,
    pub target: TargetPath,
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

impl TrackData {
    fn last_frame(&self) -> f32 {
        match self {
            TrackData::Vector3(track) => track.last_frame(),
            TrackData::Quaternion(track) => track.last_frame(),
        }
    }
}

/// A complete track definition: which bone channel, and its keyframes.
#[derive(Debug, Clone)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

impl Track {
    #[must_use]
    pub fn translation(bone_name: &str, track: KeyframeTrack<Vec3>) -> Self {
        Self {
            meta: TrackMeta {
                bone_name: bone_name.to_string(),
                target: TargetPath::Translation,
            },
            data: TrackData::Vector3(track),
        }
    }

    #[must_use]
    pub fn rotation(bone_name: &str, track: KeyframeTrack<Quat>) -> Self {
        Self {
            meta: TrackMeta {
                bone_name: bone_name.to_string(),
                target: TargetPath::Rotation,
            },
            data: TrackData::Quaternion(track),
        }
    }
}

/// A reusable motion asset, played over a frame range.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    /// Last frame of the clip; playback covers `0..=end_frame`.
    pub end_frame: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Creates a clip whose length is the last key across all tracks.
    #[must_use]
    pub fn new(name: &str, tracks: Vec<Track>) -> Self {
        let end_frame = tracks.iter().map(|t| t.data.last_frame()).fold(0.0_f32, f32::max);
        Self::with_length(name, end_frame, tracks)
    }

    /// Creates a clip with an explicit length in frames.
    #[must_use]
    pub fn with_length(name: &str, end_frame: f32, tracks: Vec<Track>) -> Self {
        Self {
            name: name.to_string(),
            end_frame: end_frame.max(0.0),
            tracks,
        }
    }

    #[inline]
    #[must_use]
    pub fn duration_in_frames(&self) -> f32 {
        self.end_frame
    }

    /// Location of `bone` at `frame`, or `None` if the clip does not animate it.
    #[must_use]
    pub fn sample_translation(&self, bone: &str, frame: f32) -> Option<Vec3> {
        self.tracks
            .iter()
            .filter(|t| t.meta.bone_name == bone)
            .find_map(|t| match &t.data {
                TrackData::Vector3(track) => track.sample(frame),
                TrackData::Quaternion(_) => None,
            })
    }

    /// Rotation of `bone` at `frame`, or `None` if the clip does not animate it.
    #[must_use]
    pub fn sample_rotation(&self, bone: &str, frame: f32) -> Option<Quat> {
        self.tracks
            .iter()
            .filter(|t| t.meta.bone_name == bone)
            .find_map(|t| match &t.data {
                TrackData::Quaternion(track) => track.sample(frame),
                TrackData::Vector3(_) => None,
            })
    }

    /// Location of `bone` at `frame`, resuming from `cursors` (one per
    /// track, in track order).
    pub fn sample_translation_with(&self, bone: &str, frame: f32, cursors: &mut [KeyframeCursor]) -> Option<Vec3> {
        self.tracks
            .iter()
            .zip(cursors.iter_mut())
            .filter(|(t, _)| t.meta.bone_name == bone)
            .find_map(|(t, cursor)| match &t.data {
                TrackData::Vector3(track) => track.sample_with_cursor(frame, cursor),
                TrackData::Quaternion(_) => None,
            })
    }

    /// Rotation of `bone` at `frame`, resuming from `cursors`.
    pub fn sample_rotation_with(&self, bone: &str, frame: f32, cursors: &mut [KeyframeCursor]) -> Option<Quat> {
        self.tracks
            .iter()
            .zip(cursors.iter_mut())
            .filter(|(t, _)| t.meta.bone_name == bone)
            .find_map(|(t, cursor)| match &t.data {
                TrackData::Quaternion(track) => track.sample_with_cursor(frame, cursor),
                TrackData::Vector3(_) => None,
            })
    }
}
