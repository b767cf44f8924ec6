//! Animation Graph Settings
//!
//! Host-facing configuration for [`AnimationGraph`](super::AnimationGraph)
//! and [`RootMotionLocomotion`](super::RootMotionLocomotion). Both are plain
//! serde structs with defaults for every field, so a host can load them from
//! JSON or build them in code.
//!
//! ```rust,ignore
//! use myth_animgraph::runtime::AnimationGraphSettings;
//!
//! let settings = AnimationGraphSettings::from_json(r#"{ "root_bone": "Root", "fps": 30 }"#)?;
//! assert_eq!(settings.root_bone(), Some("Root"));
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{AnimGraphError, Result};
use crate::utils::time::{Scheduler, TimeMode};

/// Default playback rate of clips, in frames per second.
pub const DEFAULT_FPS: f32 = 24.0;

/// Default name of the mix node driven by locomotion.
pub const DEFAULT_MIXER_NODE: &str = "Mix";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationGraphSettings {
    /// Bone whose translation channels carry root motion.
    pub root_bone: Option<String>,
    /// Frames per second used to convert elapsed time into clip frames.
    pub fps: f32,
    pub priority: u32,
    pub speed: f32,
    /// Blend-in length handed to every playback request, in [0, 1].
    pub blend: f32,
    /// Time base of the scheduler created by [`scheduler`](Self::scheduler).
    pub time_mode: TimeMode,
}

impl Default for AnimationGraphSettings {
    fn default() -> Self {
        Self {
            root_bone: None,
            fps: DEFAULT_FPS,
            priority: 0,
            speed: 1.0,
            blend: 0.0,
            time_mode: TimeMode::default(),
        }
    }
}

impl AnimationGraphSettings {
    /// Parses and validates settings from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(AnimGraphError::InvalidSettings(format!(
                "fps must be a finite value > 0, got {}",
                self.fps
            )));
        }
        if !self.speed.is_finite() {
            return Err(AnimGraphError::InvalidSettings(format!(
                "speed must be finite, got {}",
                self.speed
            )));
        }
        if !(0.0..=1.0).contains(&self.blend) {
            return Err(AnimGraphError::InvalidSettings(format!(
                "blend must be in [0, 1], got {}",
                self.blend
            )));
        }
        Ok(())
    }

    /// The root bone name with surrounding whitespace removed. Blank names
    /// mean no root motion.
    #[must_use]
    pub fn root_bone(&self) -> Option<&str> {
        self.root_bone.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }

    /// Creates a scheduler in the configured time mode.
    pub fn scheduler(&self) -> Result<Scheduler> {
        Scheduler::new(self.time_mode, self.fps)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionSettings {
    /// Name of the mix node whose ratio follows the requested movement.
    pub mixer_node: String,
    /// Column-major rest matrix of the root bone. Identity when absent.
    pub root_bone_matrix: Option<[f32; 9]>,
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            mixer_node: DEFAULT_MIXER_NODE.to_string(),
            root_bone_matrix: None,
        }
    }
}

impl LocomotionSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
