use crate::graph::{NumVertices, Vertex};

/// Union-find over the original vertex indices with path compression. The
/// solver uses it to track which vertices are already chained into one
/// partial path segment, so that edges closing a premature sub-cycle can be
/// forbidden. No union-by-rank; at the instance sizes this solver targets
/// the worst case is acceptable.
#[derive(Clone, Debug)]
pub struct DisjointVertexSet {
    parent: Vec<Vertex>,
}

impl DisjointVertexSet {
    pub fn new(n: NumVertices) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    pub fn number_of_vertices(&self) -> NumVertices {
        self.parent.len() as NumVertices
    }

    /// Canonical representative of `x`'s partition; compresses the path.
    pub fn find(&mut self, x: Vertex) -> Vertex {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        let mut current = x;
        while current != root {
            let next = self.parent[current as usize];
            self.parent[current as usize] = root;
            current = next;
        }

        root
    }

    /// Attaches `x`'s root under `y`'s root. Idempotent if both are already
    /// in the same partition.
    pub fn union(&mut self, x: Vertex, y: Vertex) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        self.parent[root_x as usize] = root_y;
    }

    pub fn same_set(&mut self, x: Vertex, y: Vertex) -> bool {
        self.find(x) == self.find(y)
    }
}
