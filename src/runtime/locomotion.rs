use flume::Receiver;
use glam::{Mat3, Vec3};

use crate::animation::{ActionTarget, AnimationResult};
use crate::errors::{AnimGraphError, Result};
use crate::nodetree::NodeId;
use crate::runtime::graph::AnimationGraph;
use crate::runtime::settings::LocomotionSettings;

/// Moves an actor by the root motion its animation graph extracts.
///
/// Each frame the requested movement's `y` becomes the mix ratio of a named
/// mix node, and every result the graph publishes is converted from root
/// bone space into actor space and accumulated until the host takes it.
#[derive(Debug)]
pub struct RootMotionLocomotion {
    settings: LocomotionSettings,
    mixer: Option<NodeId>,
    disabled: bool,
    results: Option<Receiver<AnimationResult>>,
    to_actor: Mat3,
    movement: Vec3,
    displacement: Vec3,
}

impl RootMotionLocomotion {
    #[must_use]
    pub fn new(settings: LocomotionSettings) -> Self {
        Self {
            settings,
            mixer: None,
            disabled: false,
            results: None,
            to_actor: Mat3::IDENTITY,
            movement: Vec3::ZERO,
            displacement: Vec3::ZERO,
        }
    }

    /// Finds the mixer node and subscribes to `graph`'s results.
    ///
    /// On failure the error is logged and locomotion stays disabled for the
    /// rest of its life.
    pub fn initialize<T: ActionTarget>(&mut self, graph: &mut AnimationGraph<T>) -> Result<()> {
        if self.disabled {
            return Err(self.disabled_error());
        }
        if self.results.is_some() {
            return Err(AnimGraphError::AlreadyInitialized);
        }

        match self.configure(graph) {
            Ok(mixer) => {
                self.mixer = Some(mixer);
                self.results = Some(graph.on_advance());
                Ok(())
            }
            Err(error) => {
                log::error!("Root motion locomotion disabled: {error}");
                self.disabled = true;
                Err(AnimGraphError::FeatureDisabled(error.to_string()))
            }
        }
    }

    fn configure<T: ActionTarget>(&mut self, graph: &AnimationGraph<T>) -> Result<NodeId> {
        let mixer = graph.tree().find_mix(&self.settings.mixer_node)?;

        let rest = self
            .settings
            .root_bone_matrix
            .map_or(Mat3::IDENTITY, |m| Mat3::from_cols_array(&m));
        if rest.determinant().abs() <= f32::EPSILON {
            return Err(AnimGraphError::InvalidSettings(
                "root bone matrix is not invertible".to_string(),
            ));
        }
        // Offsets are row vectors multiplied by the inverse rest matrix.
        self.to_actor = rest.inverse().transpose();

        Ok(mixer)
    }

    fn disabled_error(&self) -> AnimGraphError {
        AnimGraphError::FeatureDisabled(format!("mixer node '{}'", self.settings.mixer_node))
    }

    #[inline]
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    #[must_use]
    pub fn mixer(&self) -> Option<NodeId> {
        self.mixer
    }

    #[must_use]
    pub fn movement(&self) -> Vec3 {
        self.movement
    }

    /// Requested movement; `y` drives the mixer.
    pub fn set_movement(&mut self, movement: Vec3) {
        self.movement = movement;
    }

    /// Collects published results and updates the mixer.
    ///
    /// Does nothing once disabled.
    pub fn process<T: ActionTarget>(&mut self, graph: &mut AnimationGraph<T>) -> Result<()> {
        if self.disabled {
            return Ok(());
        }
        let (Some(mixer), Some(results)) = (self.mixer, &self.results) else {
            return Err(AnimGraphError::NotRunning);
        };

        for result in results.try_iter() {
            self.displacement += self.to_actor * result.offset();
        }

        graph.tree_mut().mix_node_mut(mixer)?.set_mix(self.movement.y)
    }

    /// Displacement accumulated since the last call, in actor space.
    pub fn take_displacement(&mut self) -> Vec3 {
        std::mem::take(&mut self.displacement)
    }
}
