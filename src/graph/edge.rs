use serde::Serialize;

use super::*;

/// A directed edge of the cost graph. Two edges are equal iff begin, end
/// *and* cost all match; this is relied upon by [`super::Tour::push`] to
/// dedupe path membership.
#[derive(Clone, Copy, PartialEq, PartialOrd, Debug, Serialize)]
pub struct Edge {
    pub begin: Vertex,
    pub end: Vertex,
    #[serde(serialize_with = "super::serialize_cost")]
    pub cost: Cost,
}

impl Edge {
    pub fn new(begin: Vertex, end: Vertex, cost: Cost) -> Self {
        Self { begin, end, cost }
    }
}

/// Decision taken at a search-tree node. The left child of a branching
/// excludes the chosen cell, the right child commits to the edge (with its
/// true cost from the original input matrix).
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub enum BranchStep {
    Exclude(Vertex, Vertex),
    Include(Edge),
}

impl BranchStep {
    /// The committed edge, if this is an include decision.
    pub fn included_edge(&self) -> Option<Edge> {
        match self {
            BranchStep::Exclude(..) => None,
            BranchStep::Include(e) => Some(*e),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            BranchStep::Exclude(b, e) => format!("/({}, {})", b + 1, e + 1),
            BranchStep::Include(edge) => format!("({}, {})", edge.begin + 1, edge.end + 1),
        }
    }
}
