use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{SecondaryMap, SlotMap};
use smallvec::SmallVec;

use crate::animation::{AnimationResult, Animator};
use crate::errors::{AnimGraphError, Result};
use crate::nodetree::action::PlayActionNode;
use crate::nodetree::mix::MixAnimationNode;
use crate::nodetree::node::{AnimationNode, EvalContext, NodeId, NodeKind, NodeState, depth_of};
use crate::nodetree::socket::{LinkId, NodeLink, SocketType};

/// An authored animation tree: named nodes, the links between them and the
/// per-node runtime state evaluation needs.
///
/// Links are resolved into per-node inputs whenever the structure changes.
/// A tree is valid when it has exactly one output node and every node the
/// output reaches has its required inputs; an invalid tree evaluates to a zero offset and issues
/// no playback requests.
#[derive(Debug, Default)]
pub struct AnimationNodeTree {
    nodes: SlotMap<NodeId, AnimationNode>,
    states: SecondaryMap<NodeId, NodeState>,
    names: SecondaryMap<NodeId, String>,
    by_name: FxHashMap<String, NodeId>,

    links: SlotMap<LinkId, NodeLink>,
    next_serial: u64,

    output: Option<NodeId>,
    valid: bool,
    started: bool,
    last_issue: Option<String>,
}

impl AnimationNodeTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Authoring
    // ========================================================================

    /// Adds a node under a unique name.
    pub fn add_node(&mut self, name: &str, node: impl Into<AnimationNode>) -> Result<NodeId> {
        if self.by_name.contains_key(name) {
            return Err(AnimGraphError::DuplicateNodeName(name.to_string()));
        }

        let id = self.nodes.insert(node.into());
        self.states.insert(id, NodeState::default());
        self.names.insert(id, name.to_string());
        self.by_name.insert(name.to_string(), id);

        self.validate();
        Ok(id)
    }

    /// Removes a node, every link touching it and its runtime state.
    pub fn remove_node(&mut self, id: NodeId) -> Result<AnimationNode> {
        let node = self.nodes.remove(id).ok_or(AnimGraphError::StaleNode)?;

        self.states.remove(id);
        if let Some(name) = self.names.remove(id) {
            self.by_name.remove(&name);
        }
        self.links.retain(|_, link| link.from_node != id && link.to_node != id);

        self.validate();
        Ok(node)
    }

    /// Copies a node's authored data and runtime state to a new node named
    /// `<name>.NNN`. Links are not copied.
    pub fn duplicate_node(&mut self, id: NodeId) -> Result<NodeId> {
        let node = self.nodes.get(id).ok_or(AnimGraphError::StaleNode)?.clone();
        let state = self.states.get(id).cloned().unwrap_or_default();
        let name = self.unique_name(self.names.get(id).map_or("", String::as_str));

        let copy = self.nodes.insert(node);
        self.states.insert(copy, state);
        self.names.insert(copy, name.clone());
        self.by_name.insert(name, copy);

        self.validate();
        Ok(copy)
    }

    fn unique_name(&self, name: &str) -> String {
        let base = match name.rsplit_once('.') {
            Some((base, suffix)) if suffix.len() == 3 && suffix.bytes().all(|b| b.is_ascii_digit()) => base,
            _ => name,
        };
        (1..)
            .map(|n| format!("{base}.{n:03}"))
            .find(|candidate| !self.by_name.contains_key(candidate))
            .unwrap_or_default()
    }

    /// Connects `from`'s output to input socket `to_socket` of `to`.
    ///
    /// The link is kept only if it survives validation: a socket accepts the
    /// first compatible link made to it, and links to float sockets, missing
    /// sockets or from the output node are discarded.
    pub fn link(&mut self, from: NodeId, to: NodeId, to_socket: usize) -> Result<LinkId> {
        if !self.nodes.contains_key(from) || !self.nodes.contains_key(to) {
            return Err(AnimGraphError::StaleNode);
        }

        let serial = self.next_serial;
        self.next_serial += 1;
        let id = self.links.insert(NodeLink {
            from_node: from,
            to_node: to,
            to_socket,
            valid: true,
            serial,
        });

        self.validate();
        Ok(id)
    }

    /// Removes a link. Returns `None` if it was already gone.
    pub fn unlink(&mut self, id: LinkId) -> Option<NodeLink> {
        let link = self.links.remove(id)?;
        self.validate();
        Some(link)
    }

    #[must_use]
    pub fn link_info(&self, id: LinkId) -> Option<&NodeLink> {
        self.links.get(id)
    }

    pub fn links(&self) -> impl Iterator<Item = (LinkId, &NodeLink)> {
        self.links.iter()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Resolves links into node inputs and locates the output node.
    ///
    /// Never fails: structural problems make the tree invalid and are logged
    /// once per distinct problem.
    pub fn validate(&mut self) -> bool {
        for id in self.nodes.keys() {
            let state = self.states.entry(id).map(|e| e.or_default());
            if let Some(state) = state {
                state.inputs = [None; 2];
                state.valid = true;
            }
        }

        self.resolve_links();
        self.break_cycles();

        let mut outputs: SmallVec<[NodeId; 2]> = SmallVec::new();
        for (id, node) in &self.nodes {
            if node.kind() == NodeKind::Output {
                outputs.push(id);
            }
            if let Some(state) = self.states.get_mut(id) {
                state.valid = state.valid && node.accepts(&state.inputs);
            }
        }

        self.output = match outputs.as_slice() {
            [output] => Some(*output),
            _ => None,
        };

        // Only nodes the output reaches decide validity.
        let reachable = self.output.map(|output| self.subtree(output)).unwrap_or_default();
        let unresolved = self
            .nodes
            .keys()
            .find(|&id| reachable.contains(&id) && !self.states.get(id).is_some_and(NodeState::valid));

        let issue = if outputs.is_empty() {
            Some("no output node".to_string())
        } else if outputs.len() > 1 {
            Some(format!("{} output nodes", outputs.len()))
        } else if let Some(id) = unresolved {
            Some(format!("node '{}' has unresolved inputs", self.name(id).unwrap_or_default()))
        } else {
            None
        };

        self.valid = issue.is_none();
        self.report(issue);
        self.valid
    }

    fn resolve_links(&mut self) {
        let mut order: Vec<(u64, LinkId)> = self.links.iter().map(|(id, link)| (link.serial, id)).collect();
        order.sort_unstable();

        let mut rejected: SmallVec<[LinkId; 4]> = SmallVec::new();
        for (_, link_id) in order {
            let Some(link) = self.links.get_mut(link_id) else {
                continue;
            };

            let slot = animation_slot(&self.nodes, link);
            let state = self.states.get_mut(link.to_node);
            link.valid = match (slot, state) {
                (Some(slot), Some(state)) if state.inputs[slot].is_none() => {
                    state.inputs[slot] = Some(link.from_node);
                    true
                }
                _ => false,
            };

            if !link.valid {
                rejected.push(link_id);
            }
        }

        for link_id in rejected {
            if let Some(link) = self.links.remove(link_id) {
                log::debug!(
                    "Discarding link {} -> {}[{}]",
                    self.name(link.from_node).unwrap_or_default(),
                    self.name(link.to_node).unwrap_or_default(),
                    link.to_socket
                );
            }
        }
    }

    /// Invalidates every node that can reach itself through its inputs.
    fn break_cycles(&mut self) {
        let on_cycle: SmallVec<[NodeId; 4]> = self
            .nodes
            .keys()
            .filter(|&id| self.reaches(id, id))
            .collect();

        for id in on_cycle {
            if let Some(state) = self.states.get_mut(id) {
                state.inputs = [None; 2];
                state.valid = false;
            }
        }
    }

    fn reaches(&self, from: NodeId, target: NodeId) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack: SmallVec<[NodeId; 8]> = self.inputs_of(from).collect();

        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if visited.insert(id) {
                stack.extend(self.inputs_of(id));
            }
        }
        false
    }

    /// `root` and every node it reaches through resolved inputs.
    fn subtree(&self, root: NodeId) -> FxHashSet<NodeId> {
        let mut visited = FxHashSet::default();
        let mut stack: SmallVec<[NodeId; 8]> = SmallVec::new();
        stack.push(root);

        while let Some(id) = stack.pop() {
            if visited.insert(id) {
                stack.extend(self.inputs_of(id));
            }
        }
        visited
    }

    fn inputs_of(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.states
            .get(id)
            .into_iter()
            .flat_map(|state| state.inputs.into_iter().flatten())
    }

    fn report(&mut self, issue: Option<String>) {
        if issue == self.last_issue {
            return;
        }
        if let Some(problem) = &issue {
            if self.started {
                log::warn!("Animation tree is invalid: {problem}");
            } else {
                log::debug!("Animation tree is invalid: {problem}");
            }
        }
        self.last_issue = issue;
    }

    /// Validates the tree and switches structural problems to warnings.
    pub fn start(&mut self) -> bool {
        self.started = true;
        self.last_issue = None;
        let valid = self.validate();

        for (id, node) in &self.nodes {
            log::debug!(
                "Node '{}' ({}) depth {}",
                self.name(id).unwrap_or_default(),
                node.kind(),
                self.depth(id)
            );
        }
        log::info!("Animation tree started (valid: {valid})");
        valid
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[inline]
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// The unique output node, if validation found exactly one.
    #[inline]
    #[must_use]
    pub fn output(&self) -> Option<NodeId> {
        self.output
    }

    /// Number of playback layers the subtree rooted at `id` needs.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> u32 {
        depth_of(&self.nodes, &self.states, id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&AnimationNode> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn state(&self, id: NodeId) -> Option<&NodeState> {
        self.states.get(id)
    }

    #[must_use]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &AnimationNode)> {
        self.nodes.iter()
    }

    // ========================================================================
    // Named lookup
    // ========================================================================

    pub fn find(&self, name: &str) -> Result<NodeId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| AnimGraphError::NodeNotFound(name.to_string()))
    }

    /// Looks up a node by name and checks its kind.
    pub fn find_kind(&self, name: &str, expected: NodeKind) -> Result<NodeId> {
        let id = self.find(name)?;
        self.check_kind(id, expected)?;
        Ok(id)
    }

    pub fn find_mix(&self, name: &str) -> Result<NodeId> {
        self.find_kind(name, NodeKind::Mix)
    }

    pub fn find_action(&self, name: &str) -> Result<NodeId> {
        self.find_kind(name, NodeKind::PlayAction)
    }

    fn check_kind(&self, id: NodeId, expected: NodeKind) -> Result<()> {
        let actual = self.nodes.get(id).ok_or(AnimGraphError::StaleNode)?.kind();
        if actual == expected {
            Ok(())
        } else {
            Err(AnimGraphError::WrongNodeKind {
                name: self.name(id).unwrap_or_default().to_string(),
                expected,
                actual,
            })
        }
    }

    pub fn mix_node_mut(&mut self, id: NodeId) -> Result<&mut MixAnimationNode> {
        self.check_kind(id, NodeKind::Mix)?;
        match self.nodes.get_mut(id) {
            Some(AnimationNode::Mix(mix)) => Ok(mix),
            _ => Err(AnimGraphError::StaleNode),
        }
    }

    pub fn action_node_mut(&mut self, id: NodeId) -> Result<&mut PlayActionNode> {
        self.check_kind(id, NodeKind::PlayAction)?;
        match self.nodes.get_mut(id) {
            Some(AnimationNode::PlayAction(action)) => Ok(action),
            _ => Err(AnimGraphError::StaleNode),
        }
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Evaluates the tree once against `animator`.
    ///
    /// Returns the zero result without touching the animator when the tree
    /// is invalid.
    pub fn advance(&mut self, animator: &mut dyn Animator) -> Result<AnimationResult> {
        let Some(output) = self.output.filter(|_| self.valid) else {
            return Ok(AnimationResult::ZERO);
        };

        let mut ctx = EvalContext {
            nodes: &self.nodes,
            states: &mut self.states,
        };
        Ok(ctx.advance(output, animator)?.unwrap_or_default())
    }
}

/// Index into the target's resolved inputs for an animation-typed link.
fn animation_slot(nodes: &SlotMap<NodeId, AnimationNode>, link: &NodeLink) -> Option<usize> {
    if link.from_node == link.to_node {
        return None;
    }
    let source = nodes.get(link.from_node)?;
    if source.output() != Some(SocketType::Animation) {
        return None;
    }

    let sockets = nodes.get(link.to_node)?.inputs();
    if sockets.get(link.to_socket)?.ty != SocketType::Animation {
        return None;
    }
    Some(
        sockets[..link.to_socket]
            .iter()
            .filter(|socket| socket.ty == SocketType::Animation)
            .count(),
    )
}
