use crate::animation::values::Interpolatable;
use crate::errors::{AnimGraphError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    #[default]
    Linear,
    Step,
    /// Values are stored as `[in_tangent, value, out_tangent]` triplets.
    CubicSpline,
}

/// How many keyframes a cursor scans forward before falling back to a
/// binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the keyframe interval of the previous sample so sequential
/// playback resolves in O(1).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

/// A keyframed channel. Keys are expressed in frames, not seconds, matching
/// the frame ranges clips are played over.
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    frames: Vec<f32>,
    values: Vec<T>,
    interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    /// Builds a track from keys sorted by frame.
    ///
    /// Fails unless there is one value per key (three for
    /// [`InterpolationMode::CubicSpline`]) and the frames are finite and
    /// non-decreasing.
    pub fn new(frames: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Result<Self> {
        let per_key = match interpolation {
            InterpolationMode::CubicSpline => 3,
            _ => 1,
        };
        if values.len() != frames.len() * per_key {
            return Err(AnimGraphError::InvalidTrack(format!(
                "{} value(s) for {} key(s), expected {}",
                values.len(),
                frames.len(),
                frames.len() * per_key
            )));
        }
        if frames.iter().any(|f| !f.is_finite()) || frames.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(AnimGraphError::InvalidTrack(
                "key frames must be finite and sorted".to_string(),
            ));
        }

        Ok(Self {
            frames,
            values,
            interpolation,
        })
    }

    /// A single-key track holding `value` for every frame.
    #[must_use]
    pub fn constant(value: T) -> Self {
        Self {
            frames: vec![0.0],
            values: vec![value],
            interpolation: InterpolationMode::Step,
        }
    }

    #[inline]
    #[must_use]
    pub fn frames(&self) -> &[f32] {
        &self.frames
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame of the last key, or 0 for an empty track.
    #[must_use]
    pub fn last_frame(&self) -> f32 {
        self.frames.last().copied().unwrap_or(0.0)
    }

    /// Stateless sample. Returns `None` for an empty track.
    #[must_use]
    pub fn sample(&self, frame: f32) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let next = self.frames.partition_point(|&f| f <= frame);
        Some(self.sample_interval(next.saturating_sub(1), frame))
    }

    /// Sample using `cursor` as a starting guess and update it.
    pub fn sample_with_cursor(&self, frame: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        let len = self.frames.len();
        if len == 0 {
            return None;
        }
        if len == 1 {
            return Some(self.value_at(0));
        }

        let start = cursor.last_index.min(len - 1);
        let scanned = if frame >= self.frames[start] {
            (start..(start + MAX_SCAN_OFFSET).min(len - 1))
                .find(|&i| frame < self.frames[i + 1])
                .or_else(|| (frame >= self.frames[len - 1]).then_some(len - 1))
        } else {
            None
        };
        // Large jumps (scrubbing, loop reset) fall back to a binary search.
        let index = scanned
            .unwrap_or_else(|| self.frames.partition_point(|&f| f <= frame).saturating_sub(1));

        cursor.last_index = index;
        Some(self.sample_interval(index, frame))
    }

    fn value_at(&self, index: usize) -> T {
        match self.interpolation {
            InterpolationMode::CubicSpline => self.values[index * 3 + 1],
            _ => self.values[index],
        }
    }

    fn sample_interval(&self, index: usize, frame: f32) -> T {
        let len = self.frames.len();
        if index >= len - 1 {
            return self.value_at(len - 1);
        }

        let next = index + 1;
        let f0 = self.frames[index];
        let dt = self.frames[next] - f0;
        let t = if dt > 1e-6 { ((frame - f0) / dt).clamp(0.0, 1.0) } else { 0.0 };

        match self.interpolation {
            InterpolationMode::Step => self.value_at(index),
            InterpolationMode::Linear => T::interpolate_linear(self.value_at(index), self.value_at(next), t),
            InterpolationMode::CubicSpline => {
                let prev = index * 3;
                let next = next * 3;
                T::interpolate_cubic(
                    self.values[prev + 1],
                    self.values[prev + 2],
                    self.values[next],
                    self.values[next + 1],
                    t,
                    dt,
                )
            }
        }
    }
}
