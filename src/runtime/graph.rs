//! Animation Graph Driver
//!
//! [`AnimationGraph`] binds one [`AnimationNodeTree`] to one actor and
//! evaluates it once per scheduler tick:
//!
//! 1. The elapsed time since the previous tick becomes the animator's
//!    `time_delta` (the first tick only records the timestamp).
//! 2. If time advanced and the tree is valid, the tree is evaluated.
//! 3. The merged [`AnimationResult`] is published to every
//!    [`on_advance`](AnimationGraph::on_advance) receiver.
//!
//! Evaluation errors never escape a tick; they are handed to the graph's
//! error handler, which logs them by default.

use std::fmt;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Duration;

use flume::{Receiver, Sender};

use crate::animation::{ActionTarget, ActorAnimator, AnimationResult, Animator, AnimatorState};
use crate::errors::{AnimGraphError, Result};
use crate::nodetree::AnimationNodeTree;
use crate::runtime::settings::AnimationGraphSettings;
use crate::utils::time::FrameDriven;

/// Receives errors raised while a tick is processed.
pub type ErrorHandler = Box<dyn FnMut(&AnimGraphError)>;

/// Lifecycle of an [`AnimationGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphStatus {
    NotStarted,
    Running,
    Disposed,
}

pub struct AnimationGraph<T: ActionTarget> {
    tree: AnimationNodeTree,
    animator: ActorAnimator<T>,
    settings: AnimationGraphSettings,
    status: GraphStatus,
    last_timestamp: Option<Duration>,
    last_result: Option<AnimationResult>,
    subscribers: Vec<Sender<AnimationResult>>,
    error_handler: ErrorHandler,
}

impl<T: ActionTarget> fmt::Debug for AnimationGraph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationGraph")
            .field("status", &self.status)
            .field("settings", &self.settings)
            .field("last_timestamp", &self.last_timestamp)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl<T: ActionTarget> AnimationGraph<T> {
    /// Binds `tree` to the actor behind `target`.
    ///
    /// The graph does nothing until [`initialize`](Self::initialize) is called.
    pub fn new(tree: AnimationNodeTree, target: T, settings: AnimationGraphSettings) -> Result<Self> {
        settings.validate()?;

        let root_bone = settings.root_bone().map(str::to_string);
        let mut animator = ActorAnimator::new(target, settings.fps, root_bone)?;
        {
            let state = animator.state_mut();
            state.set_priority(settings.priority);
            state.set_speed(settings.speed);
            state.set_blend(settings.blend)?;
        }

        Ok(Self {
            tree,
            animator,
            settings,
            status: GraphStatus::NotStarted,
            last_timestamp: None,
            last_result: None,
            subscribers: Vec::new(),
            error_handler: Box::new(|error| log::error!("Animation graph error: {error}")),
        })
    }

    /// Starts the tree. Must be called once before the first tick.
    pub fn initialize(&mut self) -> Result<()> {
        match self.status {
            GraphStatus::NotStarted => {}
            GraphStatus::Running => return Err(AnimGraphError::AlreadyInitialized),
            GraphStatus::Disposed => return Err(AnimGraphError::NotRunning),
        }

        self.tree.start();
        self.status = GraphStatus::Running;
        Ok(())
    }

    /// Processes one tick at scheduler time `now`.
    ///
    /// Ignored unless the graph is running. Errors go to the error handler.
    pub fn update(&mut self, now: Duration) {
        if self.status != GraphStatus::Running {
            log::trace!("Ignoring tick: animation graph is {:?}", self.status);
            return;
        }

        if let Err(error) = self.step(now) {
            (self.error_handler)(&error);
        }
    }

    fn step(&mut self, now: Duration) -> Result<()> {
        let last = self.last_timestamp.unwrap_or(now);
        self.last_timestamp = Some(now);

        let delta = now.saturating_sub(last);
        if delta.is_zero() {
            return Ok(());
        }

        self.animator.state_mut().set_time_delta(delta.as_secs_f32())?;

        if !self.tree.is_valid() {
            return Ok(());
        }

        let result = self.tree.advance(&mut self.animator)?;
        self.last_result = Some(result);
        self.publish(result);
        Ok(())
    }

    fn publish(&mut self, result: AnimationResult) {
        self.subscribers.retain(|sender| sender.send(result).is_ok());
    }

    /// A stream of evaluated results, one per tick that produced one.
    ///
    /// The stream completes when the graph is disposed.
    pub fn on_advance(&mut self) -> Receiver<AnimationResult> {
        let (sender, receiver) = flume::unbounded();
        if self.status == GraphStatus::Disposed {
            drop(sender);
        } else {
            self.subscribers.push(sender);
        }
        receiver
    }

    /// Stops evaluation for good and completes every result stream.
    pub fn dispose(&mut self) {
        if self.status == GraphStatus::Disposed {
            return;
        }
        self.subscribers.clear();
        self.status = GraphStatus::Disposed;
        log::debug!("Animation graph disposed");
    }

    pub fn set_error_handler(&mut self, handler: impl FnMut(&AnimGraphError) + 'static) {
        self.error_handler = Box::new(handler);
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> GraphStatus {
        self.status
    }

    #[must_use]
    pub fn tree(&self) -> &AnimationNodeTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut AnimationNodeTree {
        &mut self.tree
    }

    #[must_use]
    pub fn animator(&self) -> &ActorAnimator<T> {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut ActorAnimator<T> {
        &mut self.animator
    }

    #[must_use]
    pub fn state(&self) -> &AnimatorState {
        self.animator.state()
    }

    #[must_use]
    pub fn settings(&self) -> &AnimationGraphSettings {
        &self.settings
    }

    /// The most recently published result.
    #[must_use]
    pub fn last_result(&self) -> Option<AnimationResult> {
        self.last_result
    }
}

impl<T: ActionTarget> FrameDriven for AnimationGraph<T> {
    fn process(&mut self, now: Duration) {
        self.update(now);
    }
}
