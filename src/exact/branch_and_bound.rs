use itertools::Itertools;
use log::{debug, info};
use serde::Serialize;
use smallvec::SmallVec;

use super::{Direction, NodeId, ReducedMatrix, SearchNode, SearchTree};
use crate::algorithm::{IterativeAlgorithm, TerminatingIterativeAlgorithm};
use crate::graph::{BranchStep, Cost, Edge, SquareMatrix, Tour};
use crate::utils::DisjointVertexSet;

/// States of the search; every [`BranchAndBound::execute_step`] performs
/// exactly one transition, which is what the trace cursor records.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum SolverState {
    Start,
    LeftBranching,
    RightBranching,
    LittleMatrix,
    End,
    Stop,
}

pub type OptionalTour = Option<Tour>;

/// Little's branch and bound for the asymmetric TSP. The input matrix must
/// satisfy [`SquareMatrix::validate_costs`]; validation is the caller's
/// responsibility (the io layer performs it when loading instances).
pub struct BranchAndBound {
    original: SquareMatrix,
    tree: Option<SearchTree>,
    current: NodeId,
    pending: Option<Edge>,
    best: Option<Tour>,
    best_bound: Cost,
    solution: Option<OptionalTour>,
    state: SolverState,
    iterations: usize,
}

impl BranchAndBound {
    pub fn new(matrix: SquareMatrix) -> Self {
        Self {
            original: matrix,
            tree: None,
            current: SearchTree::root_id(),
            pending: None,
            best: None,
            best_bound: Cost::INFINITY,
            solution: None,
            state: SolverState::Start,
            iterations: 0,
        }
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn tree(&self) -> Option<&SearchTree> {
        self.tree.as_ref()
    }

    pub fn current_node(&self) -> NodeId {
        self.current
    }

    pub fn best_bound(&self) -> Cost {
        self.best_bound
    }

    pub fn best_tour(&self) -> Option<&Tour> {
        self.best.as_ref()
    }

    /// Returns the number of state transitions processed so far.
    pub fn number_of_iterations(&self) -> usize {
        self.iterations
    }

    /// The include-path of the node the search currently works on; empty
    /// before the root exists.
    pub fn candidate_path(&self) -> Tour {
        self.tree
            .as_ref()
            .map(|t| t.node(self.current).path.clone())
            .unwrap_or_default()
    }

    fn step_start(&mut self) {
        let n = self.original.number_of_vertices();

        match n {
            0 => self.accept_trivial(Tour::new()),
            1 => {
                let mut tour = Tour::new();
                tour.push(Edge::new(0, 0, self.original[(0, 0)]));
                self.accept_trivial(tour);
            }
            2 => {
                let mut tour = Tour::new();
                tour.push(Edge::new(0, 1, self.original[(0, 1)]));
                tour.push(Edge::new(1, 0, self.original[(1, 0)]));
                if tour.cost().is_finite() {
                    self.accept_trivial(tour);
                } else {
                    self.state = SolverState::End;
                }
            }
            _ => {
                let mut matrix = ReducedMatrix::from(self.original.clone());
                let bound = matrix.reduce();
                info!("root bound {bound}");

                self.tree = Some(SearchTree::new(SearchNode::root(
                    bound,
                    matrix,
                    DisjointVertexSet::new(n),
                )));
                self.current = SearchTree::root_id();
                self.state = SolverState::LeftBranching;
            }
        }
    }

    /// Handles inputs small enough to bypass branching altogether. The
    /// single-vertex tour is degenerate (its only edge is the infinite
    /// diagonal); callers detect that via the infinite cost.
    fn accept_trivial(&mut self, tour: Tour) {
        self.best_bound = tour.cost();
        self.best = Some(tour);
        self.state = SolverState::End;
    }

    /// Scans the active matrix for zero cells and picks the one whose
    /// exclusion penalty is maximal; ties keep the first cell in row-major
    /// order. The returned edge carries the penalty as its cost.
    fn select_branching_edge(node: &SearchNode) -> Option<Edge> {
        let matrix = &node.matrix;
        let n = matrix.number_of_vertices();

        let mut zeros: SmallVec<[Edge; 16]> = SmallVec::new();
        for (row, col) in (0..n).cartesian_product(0..n) {
            if matrix[(row, col)] == 0.0 {
                let penalty =
                    matrix.min_in_row(row, Some(col)) + matrix.min_in_column(col, Some(row));
                zeros.push(Edge::new(row, col, penalty));
            }
        }

        zeros
            .into_iter()
            .fold(None, |best: Option<Edge>, candidate| match best {
                Some(b) if candidate.cost <= b.cost => Some(b),
                _ => Some(candidate),
            })
    }

    fn step_left_branching(&mut self) {
        let tree = self.tree.as_mut().expect("tree exists past Start");

        let Some(branching) = Self::select_branching_edge(tree.node(self.current)) else {
            // No zero cell left in this branch. At the root this proves that
            // no tour exists; anywhere else the leaf is abandoned.
            if self.current == SearchTree::root_id() {
                self.state = SolverState::End;
            } else {
                tree.node_mut(self.current).mark_dead();
                self.select_next_node();
            }
            return;
        };

        let parent = tree.node(self.current);
        let mut matrix = parent.matrix.clone();
        matrix[(branching.begin, branching.end)] = Cost::INFINITY;

        // Re-reducing restores the invariant that every active row and
        // column holds a zero; without it later reductions on this branch
        // would subtract the same minima a second time and overstate the
        // bound. The amount subtracted equals the exclusion penalty, except
        // that an infinite penalty (the row or column lost its last finite
        // entry) keeps the branch out of the frontier for good.
        let increment = matrix.reduce();

        let child = SearchNode::child(
            parent.bound + increment.max(branching.cost),
            BranchStep::Exclude(branching.begin, branching.end),
            matrix,
            parent.vertex_set.clone(),
            parent.path.clone(),
        );
        tree.add_child(self.current, Direction::Left, child);

        debug!(
            "branching on ({}, {}) with penalty {}",
            branching.begin, branching.end, branching.cost
        );
        self.pending = Some(branching);
        self.state = SolverState::RightBranching;
    }

    fn step_right_branching(&mut self) {
        let branching = self.pending.take().expect("set by the left branching");
        let tree = self.tree.as_mut().expect("tree exists past Start");

        let parent = tree.node(self.current);
        let parent_bound = parent.bound;
        let mut matrix = parent.matrix.clone();
        let mut vertex_set = parent.vertex_set.clone();
        let mut path = parent.path.clone();

        // Forbid every edge that would close a sub-cycle through the two
        // path segments this inclusion merges, then commit the edge.
        let n = matrix.number_of_vertices();
        for (i, j) in (0..n).cartesian_product(0..n) {
            if vertex_set.same_set(branching.begin, i) && vertex_set.same_set(branching.end, j) {
                matrix[(j, i)] = Cost::INFINITY;
            }
        }
        vertex_set.union(branching.begin, branching.end);
        matrix.delete_row_and_column(branching.begin, branching.end);

        let increment = matrix.reduce();
        let edge = Edge::new(
            branching.begin,
            branching.end,
            self.original[(branching.begin, branching.end)],
        );
        let appended = path.push(edge);
        assert!(appended);

        let terminal = matrix.real_size() == 2;
        let child = SearchNode::child(
            parent_bound + increment,
            BranchStep::Include(edge),
            matrix,
            vertex_set,
            path,
        );
        let right = tree.add_child(self.current, Direction::Right, child);

        if terminal {
            // Two active row/column pairs remain; their zero cells fix the
            // last two edges of the candidate tour.
            self.current = right;
            self.state = SolverState::LittleMatrix;
        } else {
            self.select_next_node();
        }
    }

    fn step_little_matrix(&mut self) {
        let n = self.original.number_of_vertices();
        let tree = self.tree.as_mut().expect("tree exists past Start");
        let node = tree.node(self.current);

        let forced = (0..n)
            .cartesian_product(0..n)
            .filter(|&(row, col)| node.matrix[(row, col)] == 0.0)
            .map(|(row, col)| Edge::new(row, col, self.original[(row, col)]))
            .find(|edge| !node.path.contains(edge));

        if let Some(edge) = forced {
            tree.node_mut(self.current).path.push(edge);
            return;
        }

        // All forced edges are folded in; the node is fully expanded.
        let node = tree.node_mut(self.current);
        let bound = node.bound;
        if node.path.is_complete(n) && bound < self.best_bound {
            info!(
                "improved tour of cost {} after {} iterations",
                node.path.cost(),
                self.iterations
            );
            self.best = Some(node.path.clone());
            self.best_bound = bound;
        }
        node.mark_dead();

        self.select_next_node();
    }

    /// Picks the open node of minimum bound (ties keep the first in
    /// preorder) and continues there, or ends the search once no open node
    /// can beat the best tour found.
    fn select_next_node(&mut self) {
        let tree = self.tree.as_ref().expect("tree exists past Start");

        let next = tree
            .open_nodes()
            .into_iter()
            .fold(None, |best: Option<NodeId>, id| match best {
                Some(b) if tree.node(id).bound >= tree.node(b).bound => Some(b),
                _ => Some(id),
            });

        match next {
            Some(id) if tree.node(id).bound < self.best_bound => {
                self.current = id;
                self.state = SolverState::LeftBranching;
            }
            _ => self.state = SolverState::End,
        }
    }

    fn step_end(&mut self) {
        match &self.best {
            Some(tour) => info!(
                "search finished: optimal tour of cost {} after {} iterations",
                tour.cost(),
                self.iterations
            ),
            None => info!("search finished: no tour exists"),
        }

        self.solution = Some(self.best.clone());
        self.state = SolverState::Stop;
    }
}

impl TerminatingIterativeAlgorithm<OptionalTour> for BranchAndBound {}

impl IterativeAlgorithm<OptionalTour> for BranchAndBound {
    fn execute_step(&mut self) {
        assert!(self.solution.is_none());
        self.iterations += 1;

        match self.state {
            SolverState::Start => self.step_start(),
            SolverState::LeftBranching => self.step_left_branching(),
            SolverState::RightBranching => self.step_right_branching(),
            SolverState::LittleMatrix => self.step_little_matrix(),
            SolverState::End => self.step_end(),
            SolverState::Stop => unreachable!("guarded by is_completed"),
        }
    }

    fn is_completed(&self) -> bool {
        self.state == SolverState::Stop
    }

    fn best_known_solution(&mut self) -> Option<OptionalTour> {
        // Mid-run the best tour found so far is reported, which is what a
        // cancelled search hands back.
        self.solution
            .clone()
            .or_else(|| self.best.clone().map(Some))
    }
}

/// Batch entry point: runs the search to completion and returns the optimal
/// tour, or `None` if the graph admits no Hamiltonian cycle.
pub fn solve(matrix: SquareMatrix) -> OptionalTour {
    BranchAndBound::new(matrix).run_to_completion().flatten()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::exact::naive::naive_solver;
    use crate::log::build_logger_for_level;
    use crate::testing::{classic_instance, random_instance_stream};

    const INF: Cost = Cost::INFINITY;

    #[test]
    fn empty_graph() {
        let tour = solve(SquareMatrix::new(0)).unwrap();
        assert!(tour.is_empty());
        assert_eq!(tour.cost(), 0.0);
    }

    #[test]
    fn single_vertex_is_degenerate() {
        let mut matrix = SquareMatrix::new(1);
        matrix[(0, 0)] = INF;

        let tour = solve(matrix).unwrap();
        assert_eq!(tour.len(), 1);
        assert!(tour.cost().is_infinite());
    }

    #[test]
    fn two_vertices() {
        let matrix =
            SquareMatrix::from_rows(vec![vec![INF, 3.0], vec![4.0, INF]]).unwrap();

        let tour = solve(matrix).unwrap();
        assert_eq!(tour.cost(), 7.0);
        assert!(tour.is_complete(2));
    }

    #[test]
    fn classic_four_city_instance() {
        build_logger_for_level(log::LevelFilter::Info);

        let mut algo = BranchAndBound::new(classic_instance());
        let tour = algo.run_to_completion().unwrap().unwrap();

        assert_eq!(tour.cost(), 35.0);
        assert!(tour.is_complete(4));
        assert_eq!(algo.best_bound(), 35.0);
    }

    #[test]
    fn triangle() {
        let matrix = SquareMatrix::from_rows(vec![
            vec![INF, 1.0, 9.0],
            vec![9.0, INF, 2.0],
            vec![3.0, 9.0, INF],
        ])
        .unwrap();

        let tour = solve(matrix).unwrap();
        assert_eq!(tour.cost(), 6.0);
        assert!(tour.is_complete(3));
    }

    #[test]
    fn exclusion_keeps_bounds_admissible() {
        // An instance whose exclude branches carry large penalties; if their
        // matrices were left unreduced, the inflated bounds would cut off
        // the optimal tour 0 -> 1 -> 2 -> 3 -> 0 of cost 25.
        let matrix = SquareMatrix::from_rows(vec![
            vec![INF, 14.0, 5.0, 16.0],
            vec![23.0, INF, 2.0, 1.0],
            vec![5.0, 19.0, INF, 4.0],
            vec![5.0, 9.0, 9.0, INF],
        ])
        .unwrap();

        let tour = solve(matrix.clone()).unwrap();
        assert!(tour.is_complete(4));
        assert_eq!(tour.cost(), 25.0);
        assert_eq!(tour.cost(), naive_solver(&matrix).unwrap().cost());
    }

    #[test]
    fn isolated_vertex_has_no_tour() {
        let mut matrix = classic_instance();
        for col in matrix.vertices() {
            matrix[(2, col)] = INF;
        }

        assert!(solve(matrix).is_none());
    }

    #[test]
    fn tour_edges_carry_original_costs() {
        let matrix = classic_instance();
        let tour = solve(matrix.clone()).unwrap();

        let mut total = 0.0;
        for edge in tour.iter() {
            assert_eq!(edge.cost, matrix[(edge.begin, edge.end)]);
            total += edge.cost;
        }
        assert_eq!(total, tour.cost());
    }

    #[test]
    fn matches_brute_force_on_random_instances() {
        for n in 3..=7 {
            for matrix in random_instance_stream(0x5eed ^ n as u64, n, 25).take(10) {
                let expected = naive_solver(&matrix).expect("complete graphs have tours");
                let tour = solve(matrix.clone()).expect("complete graphs have tours");

                assert!(tour.is_complete(n), "n={n}");
                assert_eq!(tour.cost(), expected.cost(), "n={n}\n{matrix:?}");
            }
        }
    }

    #[test]
    fn search_tree_paths_match_node_paths() {
        let mut algo = BranchAndBound::new(classic_instance());
        algo.run_to_completion();

        let tree = algo.tree().unwrap();
        for id in 0..tree.len() {
            let node = tree.node(id);
            let reconstructed = tree.path_to(id);
            // LittleMatrix appends forced edges directly to the node's path,
            // so the reconstruction is a prefix of it.
            assert!(reconstructed.len() <= node.path.len());
            for (expected, actual) in reconstructed.iter().zip(node.path.iter()) {
                assert_eq!(*expected, actual);
            }
        }
    }
}
