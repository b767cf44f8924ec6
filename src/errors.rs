//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`AnimGraphError`] covers:
//! - Out-of-range values handed to validated setters
//! - Keyframe tracks whose keys and values do not line up
//! - Named node lookups that fail or find the wrong kind of node
//! - Layer bookkeeping that would go below zero
//! - Settings that fail to parse or validate
//! - Driver lifecycle misuse
//!
//! Structural problems in a node tree (missing output, unlinked inputs) are
//! *not* errors: they make the tree invalid and evaluation produces nothing.
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, AnimGraphError>`.
//!
//! ```rust,ignore
//! use myth_animgraph::errors::Result;
//!
//! fn configure(state: &mut AnimatorState) -> Result<()> {
//!     state.set_weight(0.5)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::nodetree::NodeKind;

/// The main error type for the animation graph.
#[derive(Error, Debug)]
pub enum AnimGraphError {
    // ========================================================================
    // Value Errors
    // ========================================================================
    /// A validated property was assigned a value outside its domain.
    #[error("Invalid value for '{name}': {value} (expected {expected})")]
    InvalidParameter {
        /// Property name
        name: &'static str,
        /// The rejected value, formatted
        value: String,
        /// Human readable description of the accepted domain
        expected: &'static str,
    },

    /// Descending into a subtree would assign a negative layer.
    #[error("Layer underflow: cannot reserve {depth} layer(s) below layer {layer}")]
    LayerUnderflow {
        /// The layer the parent node was evaluated on
        layer: u32,
        /// Depth of the subtree that was subtracted
        depth: u32,
    },

    /// Keyframe data does not line up with its interpolation mode.
    #[error("Invalid keyframe track: {0}")]
    InvalidTrack(String),

    // ========================================================================
    // Node Lookup Errors
    // ========================================================================
    /// No node carries the requested name.
    #[error("Node not found: '{0}'")]
    NodeNotFound(String),

    /// A node was found but is not of the expected kind.
    #[error("Node '{name}' is a {actual} node (expected {expected})")]
    WrongNodeKind {
        /// Node name
        name: String,
        /// Kind the caller asked for
        expected: NodeKind,
        /// Kind the node actually has
        actual: NodeKind,
    },

    /// A node with the same name already exists in the tree.
    #[error("Duplicate node name: '{0}'")]
    DuplicateNodeName(String),

    /// The node id refers to a node that has been removed.
    #[error("Node id refers to a removed node")]
    StaleNode,

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Settings failed validation.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Settings could not be parsed.
    #[error("Settings parse error: {0}")]
    SettingsParse(#[from] serde_json::Error),

    /// A feature failed to configure and has been switched off.
    #[error("Feature disabled: {0}")]
    FeatureDisabled(String),

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// The driver has not been initialized, or has been disposed.
    #[error("Animation graph is not running")]
    NotRunning,

    /// `initialize` was called more than once.
    #[error("Animation graph is already initialized")]
    AlreadyInitialized,
}

impl AnimGraphError {
    pub(crate) fn invalid(name: &'static str, value: impl ToString, expected: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            expected,
        }
    }
}

/// Alias for `Result<T, AnimGraphError>`.
pub type Result<T> = std::result::Result<T, AnimGraphError>;
