use rand::Rng;

use super::*;

/// Generates a complete asymmetric instance with integral costs drawn
/// uniformly from `1..=max_cost` and an infinite diagonal.
pub fn random_cost_matrix(rng: &mut impl Rng, n: NumVertices, max_cost: u32) -> SquareMatrix {
    let mut matrix = SquareMatrix::new(n);

    for row in matrix.vertices() {
        for col in matrix.vertices() {
            matrix[(row, col)] = if row == col {
                Cost::INFINITY
            } else {
                rng.gen_range(1..=max_cost) as Cost
            };
        }
    }

    matrix
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn generated_instances_satisfy_input_contract() {
        let mut rng = Pcg64::seed_from_u64(1234);

        for n in [0, 1, 2, 5, 12] {
            let matrix = random_cost_matrix(&mut rng, n, 50);
            assert_eq!(matrix.number_of_vertices(), n);
            assert!(matrix.validate_costs().is_ok());
        }
    }
}
