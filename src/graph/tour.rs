use std::io::Write;

use serde::Serialize;

use super::*;

/// An ordered sequence of edges with a running total cost. Used both for the
/// partial include-paths accumulated along the search tree and for complete
/// Hamiltonian cycles.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Tour {
    edges: Vec<Edge>,
    #[serde(serialize_with = "super::serialize_cost")]
    cost: Cost,
}

impl Tour {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an edge unless an equal edge (same begin, end and cost) is
    /// already part of the tour. Returns whether the edge was appended.
    pub fn push(&mut self, edge: Edge) -> bool {
        if self.contains(&edge) {
            return false;
        }

        self.cost += edge.cost;
        self.edges.push(edge);
        true
    }

    pub fn contains(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }

    /// True iff the tour has at least one edge and a finite total cost.
    pub fn exists(&self) -> bool {
        !self.edges.is_empty() && self.cost.is_finite()
    }

    /// True iff the edges form a single directed cycle visiting each of the
    /// `n` vertices exactly once. The empty tour is the complete tour of the
    /// empty graph.
    pub fn is_complete(&self, n: NumVertices) -> bool {
        if self.edges.len() != n as usize {
            return false;
        }
        if n == 0 {
            return true;
        }

        let mut successor: Vec<Option<Vertex>> = vec![None; n as usize];
        let mut has_incoming = vec![false; n as usize];

        for edge in &self.edges {
            if edge.begin >= n || edge.end >= n {
                return false;
            }
            if successor[edge.begin as usize].is_some() || has_incoming[edge.end as usize] {
                return false;
            }
            successor[edge.begin as usize] = Some(edge.end);
            has_incoming[edge.end as usize] = true;
        }

        // out-degrees and in-degrees are all one; it remains to check that
        // vertex 0 lies on a cycle of length n
        let mut steps = 0;
        let mut current = 0;
        loop {
            current = match successor[current as usize] {
                Some(next) => next,
                None => return false,
            };
            steps += 1;

            if current == 0 {
                return steps == n;
            }
            if steps > n {
                return false;
            }
        }
    }

    /// Writes the tour using 1-based vertex indices: the total cost followed
    /// by one `begin end cost` line per edge.
    pub fn write<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        writeln!(&mut writer, "{}", self.cost)?;
        for edge in &self.edges {
            writeln!(
                &mut writer,
                "{} {} {}",
                edge.begin + 1,
                edge.end + 1,
                edge.cost
            )?;
        }
        Ok(())
    }
}
