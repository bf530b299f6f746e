use serde::Serialize;

use super::ReducedMatrix;
use crate::graph::{BranchStep, Cost, Edge, Tour};
use crate::utils::DisjointVertexSet;

pub type NodeId = usize;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum Direction {
    Left,
    Right,
}

/// One node of the binary search tree. Matrix, vertex set and partial path
/// are exclusively owned; branching deep-clones them from the parent, so no
/// state is ever shared between nodes. The parent link is an arena index,
/// not an owning reference.
#[derive(Clone, Debug)]
pub struct SearchNode {
    pub bound: Cost,
    pub step: Option<BranchStep>,
    pub matrix: ReducedMatrix,
    pub vertex_set: DisjointVertexSet,
    pub path: Tour,
    parent: Option<(NodeId, Direction)>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    dead: bool,
}

impl SearchNode {
    pub fn root(bound: Cost, matrix: ReducedMatrix, vertex_set: DisjointVertexSet) -> Self {
        Self {
            bound,
            step: None,
            matrix,
            vertex_set,
            path: Tour::new(),
            parent: None,
            left: None,
            right: None,
            dead: false,
        }
    }

    pub fn child(
        bound: Cost,
        step: BranchStep,
        matrix: ReducedMatrix,
        vertex_set: DisjointVertexSet,
        path: Tour,
    ) -> Self {
        Self {
            bound,
            step: Some(step),
            matrix,
            vertex_set,
            path,
            parent: None,
            left: None,
            right: None,
            dead: false,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent.map(|(id, _)| id)
    }

    pub fn direction(&self) -> Option<Direction> {
        self.parent.map(|(_, dir)| dir)
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// An open node is a childless node still eligible for branching.
    pub fn is_open(&self) -> bool {
        self.left.is_none() && self.right.is_none() && !self.dead
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Removes the node from the open frontier for good; used for nodes that
    /// cannot be branched any further.
    pub fn mark_dead(&mut self) {
        self.dead = true;
    }
}

/// Serializable, matrix-free view of a node, sufficient for an external
/// renderer to draw the search tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub direction: Option<Direction>,
    #[serde(serialize_with = "crate::graph::serialize_cost")]
    pub bound: Cost,
    pub step: Option<BranchStep>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub dead: bool,
}

/// Arena of search nodes; the root has id 0 and nodes are append-only, so a
/// prefix of the arena is a consistent snapshot of an earlier tree state.
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    pub fn new(root: SearchNode) -> Self {
        Self { nodes: vec![root] }
    }

    pub const fn root_id() -> NodeId {
        0
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id]
    }

    /// Attaches `child` below `parent` in the given direction and returns its
    /// id. The slot must still be free.
    pub fn add_child(&mut self, parent: NodeId, direction: Direction, mut child: SearchNode) -> NodeId {
        let id = self.nodes.len();
        child.parent = Some((parent, direction));
        self.nodes.push(child);

        let parent = &mut self.nodes[parent];
        let slot = match direction {
            Direction::Left => &mut parent.left,
            Direction::Right => &mut parent.right,
        };
        assert!(slot.is_none());
        *slot = Some(id);

        id
    }

    /// All open nodes in depth-first preorder, left before right. Callers
    /// re-sort by bound; the preorder fixes tie-breaking.
    pub fn open_nodes(&self) -> Vec<NodeId> {
        let mut open = Vec::new();
        let mut stack = vec![Self::root_id()];

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.is_open() {
                open.push(id);
            }
            if let Some(right) = node.right {
                stack.push(right);
            }
            if let Some(left) = node.left {
                stack.push(left);
            }
        }

        open
    }

    /// The include-side branching edges on the way from the root to `id`, in
    /// root-to-node order.
    pub fn path_to(&self, id: NodeId) -> Vec<Edge> {
        let mut edges = Vec::new();
        let mut current = Some(id);

        while let Some(id) = current {
            let node = &self.nodes[id];
            if let Some(edge) = node.step.as_ref().and_then(BranchStep::included_edge) {
                edges.push(edge);
            }
            current = node.parent();
        }

        edges.reverse();
        edges
    }

    /// Dead flags of the first `len` nodes. Unlike the rest of a node, the
    /// flag mutates after insertion (abandoned leaves are marked later), so
    /// replay facilities capture it per step instead of reading it back from
    /// the arena.
    pub fn dead_flags(&self, len: usize) -> Vec<bool> {
        self.nodes[..len].iter().map(|node| node.dead).collect()
    }

    /// Snapshot of the first `len` nodes; child links pointing past the
    /// prefix are clipped, so the view matches the tree as it existed when
    /// node `len - 1` was appended.
    pub fn view(&self, len: usize) -> Vec<NodeView> {
        self.nodes[..len]
            .iter()
            .enumerate()
            .map(|(id, node)| NodeView {
                id,
                parent: node.parent(),
                direction: node.direction(),
                bound: node.bound,
                step: node.step,
                left: node.left.filter(|&c| c < len),
                right: node.right.filter(|&c| c < len),
                dead: node.dead,
            })
            .collect()
    }
}
