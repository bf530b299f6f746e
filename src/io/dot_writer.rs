use std::collections::VecDeque;
use std::io::Write;

use crate::exact::SearchTree;
use crate::graph::{Edge, SquareMatrix, Tour};

/// produces a minimalistic DOT representation for external rendering
pub trait DotWriter {
    fn try_write_dot<W: Write>(&self, writer: W) -> Result<(), std::io::Error>;
}

impl DotWriter for SquareMatrix {
    fn try_write_dot<W: Write>(&self, mut writer: W) -> Result<(), std::io::Error> {
        write!(writer, "digraph G {{ rankdir=LR; ")?;
        for u in self.vertices() {
            write!(writer, "v{}; ", u + 1)?;
        }
        for u in self.vertices() {
            for v in self.vertices() {
                if self[(u, v)].is_finite() {
                    write!(writer, "v{}->v{}[label={}]; ", u + 1, v + 1, self[(u, v)])?;
                }
            }
        }
        write!(writer, r"}}")
    }
}

/// Like [`DotWriter`] for [`SquareMatrix`], but draws the tour's edges in
/// red so a renderer can highlight the candidate path.
pub fn try_write_dot_with_tour<W: Write>(
    matrix: &SquareMatrix,
    tour: &Tour,
    mut writer: W,
) -> Result<(), std::io::Error> {
    write!(writer, "digraph G {{ rankdir=LR; ")?;
    for u in matrix.vertices() {
        write!(writer, "v{}; ", u + 1)?;
    }
    for u in matrix.vertices() {
        for v in matrix.vertices() {
            let cost = matrix[(u, v)];
            if !cost.is_finite() {
                continue;
            }
            if tour.contains(&Edge::new(u, v, cost)) {
                write!(writer, "v{}->v{}[label={cost},color=red]; ", u + 1, v + 1)?;
            } else {
                write!(writer, "v{}->v{}[label={cost}]; ", u + 1, v + 1)?;
            }
        }
    }
    write!(writer, r"}}")
}

impl DotWriter for SearchTree {
    fn try_write_dot<W: Write>(&self, mut writer: W) -> Result<(), std::io::Error> {
        write!(writer, "graph G {{ ")?;

        let mut queue = VecDeque::new();
        queue.push_back(SearchTree::root_id());

        while let Some(id) = queue.pop_front() {
            let node = self.node(id);

            let label = match &node.step {
                Some(step) => format!("{}\\n{}", node.bound, step.describe()),
                None => format!("{}", node.bound),
            };
            write!(writer, "n{id}[label=\"{label}\"]; ")?;

            for child in [node.left(), node.right()].into_iter().flatten() {
                write!(writer, "n{id}--n{child}; ")?;
                queue.push_back(child);
            }
        }

        write!(writer, r"}}")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::exact::BranchAndBound;
    use crate::graph::Cost;
    use crate::prelude::TerminatingIterativeAlgorithm;

    const INF: Cost = Cost::INFINITY;

    fn small_matrix() -> SquareMatrix {
        SquareMatrix::from_rows(vec![
            vec![INF, 1.0, 9.0],
            vec![9.0, INF, 2.0],
            vec![3.0, 9.0, INF],
        ])
        .unwrap()
    }

    #[test]
    fn graph_dot_lists_finite_edges_one_based() {
        let mut buffer = Vec::new();
        small_matrix().try_write_dot(&mut buffer).unwrap();
        let dot = String::from_utf8(buffer).unwrap();

        assert!(dot.starts_with("digraph G {"));
        assert!(dot.contains("v1->v2[label=1]"));
        assert!(dot.contains("v3->v1[label=3]"));
        assert!(!dot.contains("v1->v1"));
    }

    #[test]
    fn tour_edges_are_highlighted() {
        let matrix = small_matrix();
        let tour = crate::exact::solve(matrix.clone()).unwrap();

        let mut buffer = Vec::new();
        try_write_dot_with_tour(&matrix, &tour, &mut buffer).unwrap();
        let dot = String::from_utf8(buffer).unwrap();

        assert!(dot.contains("v1->v2[label=1,color=red]"));
        assert!(dot.contains("v2->v1[label=9]"));
    }

    #[test]
    fn tree_dot_labels_bounds_and_decisions() {
        let mut algo = BranchAndBound::new(small_matrix());
        algo.run_to_completion();

        let mut buffer = Vec::new();
        algo.tree().unwrap().try_write_dot(&mut buffer).unwrap();
        let dot = String::from_utf8(buffer).unwrap();

        assert!(dot.starts_with("graph G {"));
        assert!(dot.contains("n0[label=\"6\"]"));
        assert!(dot.contains("n0--n1"));
        // the left child of the root is an exclude decision
        assert!(dot.contains("/("));
    }
}
