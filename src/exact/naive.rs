use itertools::Itertools;

use crate::graph::{Edge, SquareMatrix, Tour};

/// Exhaustive reference solver: tries every vertex permutation with a fixed
/// start. Only meant to cross-check the branch and bound on small instances;
/// the factorial blow-up makes it useless beyond a dozen vertices.
pub fn naive_solver(matrix: &SquareMatrix) -> Option<Tour> {
    let n = matrix.number_of_vertices();

    if n <= 1 {
        let mut tour = Tour::new();
        if n == 1 {
            tour.push(Edge::new(0, 0, matrix[(0, 0)]));
        }
        return Some(tour);
    }

    let mut best: Option<Tour> = None;

    for tail in (1..n).permutations(n as usize - 1) {
        let mut cost = 0.0;
        let mut previous = 0;
        for &next in &tail {
            cost += matrix[(previous, next)];
            previous = next;
        }
        cost += matrix[(previous, 0)];

        if !cost.is_finite() || best.as_ref().is_some_and(|b| b.cost() <= cost) {
            continue;
        }

        let mut tour = Tour::new();
        let mut previous = 0;
        for &next in &tail {
            tour.push(Edge::new(previous, next, matrix[(previous, next)]));
            previous = next;
        }
        tour.push(Edge::new(previous, 0, matrix[(previous, 0)]));
        best = Some(tour);
    }

    best
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::Cost;
    use crate::testing::classic_instance;

    const INF: Cost = Cost::INFINITY;

    #[test]
    fn classic_four_city_instance() {
        let tour = naive_solver(&classic_instance()).unwrap();
        assert_eq!(tour.cost(), 35.0);
        assert!(tour.is_complete(4));
    }

    #[test]
    fn infeasible_graph() {
        let mut matrix = classic_instance();
        for col in matrix.vertices() {
            matrix[(2, col)] = INF;
        }
        assert!(naive_solver(&matrix).is_none());
    }

    #[test]
    fn two_vertices() {
        let matrix = SquareMatrix::from_rows(vec![vec![INF, 3.0], vec![4.0, INF]]).unwrap();
        let tour = naive_solver(&matrix).unwrap();
        assert_eq!(tour.cost(), 7.0);
    }
}
