use std::ops::{Index, IndexMut};

use super::*;
use crate::errors::InvalidMatrixError;

/// Dense square matrix of edge costs. The buffer is owned; `Clone` yields a
/// fully independent copy, which the solver relies on when branching.
#[derive(Clone, PartialEq)]
pub struct SquareMatrix {
    size: usize,
    entries: Vec<Cost>,
}

impl SquareMatrix {
    /// Creates an all-zero matrix with `size` rows and columns.
    pub fn new(size: NumVertices) -> Self {
        let size = size as usize;
        Self {
            size,
            entries: vec![0.0; size * size],
        }
    }

    /// Builds a matrix from row vectors; fails if the input is not square.
    pub fn from_rows(rows: Vec<Vec<Cost>>) -> Result<Self, InvalidMatrixError> {
        let size = rows.len();
        let mut entries = Vec::with_capacity(size * size);

        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(InvalidMatrixError::NotSquare {
                    row,
                    expected: size,
                    found: values.len(),
                });
            }
            entries.extend(values);
        }

        Ok(Self { size, entries })
    }

    pub fn number_of_vertices(&self) -> NumVertices {
        self.size as NumVertices
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns an iterator over V. The range does not borrow self and may be
    /// used where additional mutable references of self are needed.
    pub fn vertices(&self) -> std::ops::Range<Vertex> {
        0..self.number_of_vertices()
    }

    /// Checks the input contract of the solver: an infinite diagonal and
    /// non-negative (possibly infinite) off-diagonal costs.
    pub fn validate_costs(&self) -> Result<(), InvalidMatrixError> {
        for row in self.vertices() {
            for col in self.vertices() {
                let value = self[(row, col)];
                if row == col {
                    if value.is_finite() {
                        return Err(InvalidMatrixError::FiniteDiagonal { vertex: row });
                    }
                } else if value.is_nan() || value < 0.0 {
                    return Err(InvalidMatrixError::NegativeCost { row, col, value });
                }
            }
        }
        Ok(())
    }

    fn idx(&self, row: Vertex, col: Vertex) -> usize {
        debug_assert!((row as usize) < self.size);
        debug_assert!((col as usize) < self.size);
        row as usize * self.size + col as usize
    }
}

impl Index<(Vertex, Vertex)> for SquareMatrix {
    type Output = Cost;

    fn index(&self, (row, col): (Vertex, Vertex)) -> &Cost {
        &self.entries[self.idx(row, col)]
    }
}

impl IndexMut<(Vertex, Vertex)> for SquareMatrix {
    fn index_mut(&mut self, (row, col): (Vertex, Vertex)) -> &mut Cost {
        let idx = self.idx(row, col);
        &mut self.entries[idx]
    }
}

impl std::fmt::Debug for SquareMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.vertices() {
            for col in self.vertices() {
                let value = self[(row, col)];
                if value.is_infinite() {
                    write!(f, "{:>8}", "inf")?;
                } else {
                    write!(f, "{:>8}", value)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const INF: Cost = Cost::INFINITY;

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = SquareMatrix::from_rows(vec![vec![INF, 1.0], vec![2.0]]).unwrap_err();
        assert!(matches!(
            err,
            InvalidMatrixError::NotSquare {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn clone_is_independent() {
        let mut a = SquareMatrix::from_rows(vec![vec![INF, 1.0], vec![2.0, INF]]).unwrap();
        let b = a.clone();

        a[(0, 1)] = 99.0;

        assert_eq!(b[(0, 1)], 1.0);
        assert_eq!(a[(0, 1)], 99.0);
    }

    #[test]
    fn validate_costs_checks_diagonal_and_sign() {
        let good = SquareMatrix::from_rows(vec![vec![INF, 1.0], vec![2.0, INF]]).unwrap();
        assert!(good.validate_costs().is_ok());

        let finite_diag = SquareMatrix::from_rows(vec![vec![0.0, 1.0], vec![2.0, INF]]).unwrap();
        assert!(matches!(
            finite_diag.validate_costs(),
            Err(InvalidMatrixError::FiniteDiagonal { vertex: 0 })
        ));

        let negative = SquareMatrix::from_rows(vec![vec![INF, -1.0], vec![2.0, INF]]).unwrap();
        assert!(matches!(
            negative.validate_costs(),
            Err(InvalidMatrixError::NegativeCost { row: 0, col: 1, .. })
        ));
    }

    #[test]
    fn empty_matrix() {
        let m = SquareMatrix::new(0);
        assert!(m.is_empty());
        assert!(m.validate_costs().is_ok());
    }
}
