//! Hierarchical transform nodes
//!
//! Nodes live in a slotmap arena and reference each other by [`NodeKey`].
//! Children are an owned, ordered list; the parent back-reference exists only
//! for ancestor-cycle checks and world-matrix composition. World matrices are
//! cached and recomputed lazily: any local-transform mutation or re-parenting
//! marks the affected subtree dirty, so a read after a mutation anywhere on
//! the ancestor chain never observes a stale matrix.

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::{Mat4, Transform};
use crate::scene::bounds::Aabb;

new_key_type! {
    /// Stable handle to a node in a [`SceneGraph`]
    pub struct NodeKey;
}

/// Scene graph errors
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// Attaching the node would make it a descendant of itself
    #[error("attaching the node would create a cycle in the scene graph")]
    Cycle,

    /// The node key does not refer to a node in this graph
    #[error("node key is not present in this scene graph")]
    UnknownNode,
}

/// A single transform node
///
/// Construct with the builder methods, then attach via
/// [`SceneGraph::spawn`] or [`SceneGraph::add_child`].
#[derive(Debug, Clone)]
pub struct Node {
    local: Transform,
    world: Mat4,
    world_dirty: bool,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    name: Option<String>,
    tag: Option<String>,
    extent: Option<Aabb>,
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    /// Create a detached node with an identity local transform
    pub fn new() -> Self {
        Self {
            local: Transform::identity(),
            world: Mat4::identity(),
            world_dirty: true,
            parent: None,
            children: Vec::new(),
            name: None,
            tag: None,
            extent: None,
        }
    }

    /// Builder pattern: set the local transform
    pub fn with_transform(mut self, local: Transform) -> Self {
        self.local = local;
        self
    }

    /// Builder pattern: set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder pattern: set the picking tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Builder pattern: set the local geometric extent
    pub fn with_extent(mut self, extent: Aabb) -> Self {
        self.extent = Some(extent);
        self
    }

    /// The node's local transform
    pub fn local_transform(&self) -> &Transform {
        &self.local
    }

    /// The node's display name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The node's picking tag, if any
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The node's local geometric extent, if it carries geometry
    pub fn extent(&self) -> Option<Aabb> {
        self.extent
    }

    /// The node's parent, if attached
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// The node's children, in attachment order
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }
}

/// Arena-backed tree of transform nodes
///
/// A graph always has a root node. Detached subtrees remain in the arena and
/// may be re-attached later; nodes are only dropped with the graph itself.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, Node>,
    root: NodeKey,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph containing only a root node
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new().with_name("root"));
        Self { nodes, root }
    }

    /// The root node of the graph
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Whether the key refers to a node in this graph
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Read access to a node
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Insert a detached node into the arena
    pub fn insert(&mut self, node: Node) -> NodeKey {
        self.nodes.insert(node)
    }

    /// Insert a node and attach it under `parent` in one step
    pub fn spawn(&mut self, parent: NodeKey, node: Node) -> Result<NodeKey, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::UnknownNode);
        }
        let key = self.nodes.insert(node);
        // Cannot cycle: the key is fresh, so only the unknown-parent case
        // could fail, and that was checked above.
        self.add_child(parent, key)?;
        Ok(key)
    }

    /// Attach `child` (and its subtree) under `parent`
    ///
    /// Fails with [`SceneError::Cycle`] if `child` is `parent` itself or an
    /// ancestor of `parent`; the graph is left unmodified on failure. A child
    /// that is already attached elsewhere is detached first.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), SceneError> {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return Err(SceneError::UnknownNode);
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::Cycle);
        }

        self.remove_from_parent(child)?;
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        // The child's world matrix now composes through a different chain.
        self.mark_subtree_dirty(child);
        Ok(())
    }

    /// Detach a node and its subtree from its parent
    ///
    /// No-op if the node is already detached.
    pub fn remove_from_parent(&mut self, key: NodeKey) -> Result<(), SceneError> {
        let parent = match self.nodes.get(key) {
            Some(node) => node.parent,
            None => return Err(SceneError::UnknownNode),
        };
        let Some(parent) = parent else {
            return Ok(());
        };

        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|&c| c != key);
        }
        if let Some(node) = self.nodes.get_mut(key) {
            node.parent = None;
        }
        self.mark_subtree_dirty(key);
        Ok(())
    }

    /// Replace a node's local transform, invalidating cached world matrices
    /// for the node and all of its descendants
    pub fn set_local_transform(&mut self, key: NodeKey, local: Transform) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(key).ok_or(SceneError::UnknownNode)?;
        node.local = local;
        self.mark_subtree_dirty(key);
        Ok(())
    }

    /// The node's matrix in the root coordinate frame
    ///
    /// Reflects every ancestor transform as of the most recent mutation;
    /// dirty matrices along the ancestor chain are recomputed before the
    /// value is returned.
    pub fn world_matrix(&mut self, key: NodeKey) -> Result<Mat4, SceneError> {
        {
            let node = self.nodes.get(key).ok_or(SceneError::UnknownNode)?;
            if !node.world_dirty {
                return Ok(node.world);
            }
        }

        // Walk up collecting dirty nodes until a clean ancestor (or a
        // detached root) anchors the recomputation. A clean node implies
        // clean ancestors, because mutations dirty whole subtrees.
        let mut chain = vec![key];
        let mut anchor = Mat4::identity();
        let mut cur = self.nodes.get(key).and_then(Node::parent);
        while let Some(k) = cur {
            let Some(node) = self.nodes.get(k) else { break };
            if node.world_dirty {
                chain.push(k);
                cur = node.parent;
            } else {
                anchor = node.world;
                break;
            }
        }

        let mut world = anchor;
        for &k in chain.iter().rev() {
            if let Some(node) = self.nodes.get_mut(k) {
                world *= node.local.to_matrix();
                node.world = world;
                node.world_dirty = false;
            }
        }
        Ok(world)
    }

    /// Visit `root` and all descendants depth-first, parent before children
    ///
    /// Child lists are snapshotted before recursing, so a visitor that
    /// detaches nodes of *other* subtrees (through a separate `&mut` borrow
    /// between traversals) cannot corrupt the iteration; nodes removed from
    /// the arena mid-walk are skipped.
    pub fn traverse<F>(&self, root: NodeKey, visitor: &mut F)
    where
        F: FnMut(NodeKey, &Node),
    {
        let Some(node) = self.nodes.get(root) else { return };
        visitor(root, node);
        let children = node.children.clone();
        for child in children {
            self.traverse(child, visitor);
        }
    }

    /// Depth-first traversal granting the visitor mutable graph access
    ///
    /// The visitor may detach nodes of subtrees other than the one currently
    /// being visited; the child snapshot keeps iteration stable.
    pub fn traverse_mut<F>(&mut self, root: NodeKey, visitor: &mut F)
    where
        F: FnMut(&mut Self, NodeKey),
    {
        if !self.nodes.contains_key(root) {
            return;
        }
        visitor(self, root);
        let children = self
            .nodes
            .get(root)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            // Skip children the visitor detached since the snapshot was taken.
            if self.nodes.get(child).and_then(Node::parent) == Some(root) {
                self.traverse_mut(child, visitor);
            }
        }
    }

    /// First node in the subtree whose name equals `name`
    pub fn find_by_name(&self, root: NodeKey, name: &str) -> Option<NodeKey> {
        let mut found = None;
        self.traverse(root, &mut |key, node| {
            if found.is_none() && node.name() == Some(name) {
                found = Some(key);
            }
        });
        found
    }

    /// All nodes in the subtree carrying the given tag, in traversal order
    ///
    /// This is the usual way to build a picking candidate set.
    pub fn collect_tagged(&self, root: NodeKey, tag: &str) -> Vec<NodeKey> {
        let mut keys = Vec::new();
        self.traverse(root, &mut |key, node| {
            if node.tag() == Some(tag) {
                keys.push(key);
            }
        });
        keys
    }

    /// Pretty-print the subtree below `root`, one node per line
    pub fn dump_tree(&self, root: NodeKey) -> String {
        let mut lines = Vec::new();
        self.dump_node(root, true, "", &mut lines);
        lines.join("\n")
    }

    fn dump_node(&self, key: NodeKey, is_last: bool, prefix: &str, lines: &mut Vec<String>) {
        let Some(node) = self.nodes.get(key) else { return };
        let connector = if prefix.is_empty() {
            ""
        } else if is_last {
            "└─"
        } else {
            "├─"
        };
        let label = node.name().unwrap_or("*no-name*");
        let tag = node.tag().map(|t| format!(" [{t}]")).unwrap_or_default();
        lines.push(format!("{prefix}{connector}{label}{tag}"));

        let child_prefix = if prefix.is_empty() {
            String::new()
        } else if is_last {
            format!("{prefix}  ")
        } else {
            format!("{prefix}│ ")
        };
        let last_index = node.children.len().saturating_sub(1);
        for (index, &child) in node.children.iter().enumerate() {
            // Children of the root still need an indent level of their own.
            let next_prefix = if prefix.is_empty() { " " } else { &child_prefix };
            self.dump_node(child, index == last_index, next_prefix, lines);
        }
    }

    /// True when `candidate` is `node` itself or one of its ancestors
    fn is_ancestor_or_self(&self, candidate: NodeKey, node: NodeKey) -> bool {
        let mut cur = Some(node);
        while let Some(k) = cur {
            if k == candidate {
                return true;
            }
            cur = self.nodes.get(k).and_then(Node::parent);
        }
        false
    }

    fn mark_subtree_dirty(&mut self, root: NodeKey) {
        let mut stack = vec![root];
        while let Some(k) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(k) {
                node.world_dirty = true;
                stack.extend_from_slice(&node.children);
            }
        }
    }
}
