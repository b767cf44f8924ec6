use glam::Vec3;

use crate::errors::{AnimGraphError, Result};

/// Root-motion displacement produced by one evaluation step.
///
/// Nodes keep one instance each and refill it every frame instead of
/// allocating, so the offset is written component-wise and never replaced
/// by a non-finite value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationResult {
    offset: Vec3,
}

impl AnimationResult {
    /// A zero-offset result.
    pub const ZERO: Self = Self { offset: Vec3::ZERO };

    #[must_use]
    pub fn new() -> Self {
        Self::ZERO
    }

    #[inline]
    #[must_use]
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Overwrites the offset in place. Rejects NaN or infinite components.
    pub fn set_offset(&mut self, value: Vec3) -> Result<()> {
        if !value.is_finite() {
            return Err(AnimGraphError::invalid("offset", value, "a finite vector"));
        }
        self.offset.x = value.x;
        self.offset.y = value.y;
        self.offset.z = value.z;
        Ok(())
    }

    /// Zeroes the offset in place.
    pub fn reset(&mut self) {
        self.offset.x = 0.0;
        self.offset.y = 0.0;
        self.offset.z = 0.0;
    }

    /// Overwrites `other`'s storage with this result and hands it back.
    pub fn copy_to<'a>(&self, other: &'a mut Self) -> &'a mut Self {
        other.offset.x = self.offset.x;
        other.offset.y = self.offset.y;
        other.offset.z = self.offset.z;
        other
    }
}
