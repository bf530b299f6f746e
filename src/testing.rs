use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::graph::{random_cost_matrix, Cost, NumVertices, SquareMatrix};

/// The well-known 4-city instance with optimal cost 35.
pub fn classic_instance() -> SquareMatrix {
    const INF: Cost = Cost::INFINITY;
    SquareMatrix::from_rows(vec![
        vec![INF, 10.0, 15.0, 20.0],
        vec![5.0, INF, 9.0, 10.0],
        vec![6.0, 13.0, INF, 12.0],
        vec![8.0, 8.0, 9.0, INF],
    ])
    .unwrap()
}

/// Deterministic stream of random complete instances for cross-validation.
pub fn random_instance_stream(
    seed: u64,
    n: NumVertices,
    max_cost: u32,
) -> impl Iterator<Item = SquareMatrix> {
    let mut rng = Pcg64::seed_from_u64(seed);
    std::iter::repeat_with(move || random_cost_matrix(&mut rng, n, max_cost))
}
