use slotmap::new_key_type;

use crate::nodetree::NodeId;

new_key_type! {
    /// Stable handle of a link in an [`AnimationNodeTree`](super::AnimationNodeTree).
    pub struct LinkId;
}

/// Data carried by a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketType {
    /// An animation stream produced by another node.
    Animation,
    /// A scalar edited in place on the node; accepts no links.
    Float,
}

/// Static description of one input socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketSpec {
    pub name: &'static str,
    pub ty: SocketType,
}

impl SocketSpec {
    pub(crate) const fn animation(name: &'static str) -> Self {
        Self {
            name,
            ty: SocketType::Animation,
        }
    }

    pub(crate) const fn float(name: &'static str) -> Self {
        Self {
            name,
            ty: SocketType::Float,
        }
    }
}

/// A connection from a node's output to another node's input socket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeLink {
    pub from_node: NodeId,
    pub to_node: NodeId,
    /// Index into the target node's input sockets.
    pub to_socket: usize,
    /// Cleared by validation when the link is incompatible or redundant.
    pub valid: bool,
    /// Creation order; the first link on a socket wins.
    pub(crate) serial: u64,
}
