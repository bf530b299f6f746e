use std::ops::{Index, IndexMut};

use crate::errors::{InvariantCheck, ReductionInvariantError};
use crate::graph::{Cost, NumVertices, SquareMatrix, Vertex};

/// A cost matrix under row/column reduction. Rows and columns are never
/// physically removed; [`ReducedMatrix::delete_row_and_column`] overwrites
/// them with infinity and `real_size` counts the active row/column pairs
/// that remain.
#[derive(Clone, Debug)]
pub struct ReducedMatrix {
    matrix: SquareMatrix,
    real_size: NumVertices,
}

impl From<SquareMatrix> for ReducedMatrix {
    fn from(matrix: SquareMatrix) -> Self {
        let real_size = matrix.number_of_vertices();
        Self { matrix, real_size }
    }
}

impl ReducedMatrix {
    pub fn number_of_vertices(&self) -> NumVertices {
        self.matrix.number_of_vertices()
    }

    /// Count of active (non-eliminated) row/column pairs.
    pub fn real_size(&self) -> NumVertices {
        self.real_size
    }

    pub fn as_matrix(&self) -> &SquareMatrix {
        &self.matrix
    }

    /// Subtracts every active row's minimum from the row, then every active
    /// column's minimum from the column, and returns the total amount
    /// subtracted. Rows and columns whose minimum is zero or infinite
    /// contribute nothing; in particular a second call returns 0.
    pub fn reduce(&mut self) -> Cost {
        let mut total = 0.0;

        for row in self.matrix.vertices() {
            let min = self.min_in_row(row, None);
            if min != 0.0 && min.is_finite() {
                total += min;
                for col in self.matrix.vertices() {
                    self.matrix[(row, col)] -= min;
                }
            }
        }

        for col in self.matrix.vertices() {
            let min = self.min_in_column(col, None);
            if min != 0.0 && min.is_finite() {
                total += min;
                for row in self.matrix.vertices() {
                    self.matrix[(row, col)] -= min;
                }
            }
        }

        total
    }

    /// Minimum entry of `row`, optionally ignoring one column. The excluded
    /// variant yields the cost of the best alternative if the cell
    /// `(row, exclude)` were forbidden.
    pub fn min_in_row(&self, row: Vertex, exclude_col: Option<Vertex>) -> Cost {
        let mut min = Cost::INFINITY;
        for col in self.matrix.vertices() {
            if Some(col) != exclude_col && self.matrix[(row, col)] < min {
                min = self.matrix[(row, col)];
            }
        }
        min
    }

    pub fn min_in_column(&self, col: Vertex, exclude_row: Option<Vertex>) -> Cost {
        let mut min = Cost::INFINITY;
        for row in self.matrix.vertices() {
            if Some(row) != exclude_row && self.matrix[(row, col)] < min {
                min = self.matrix[(row, col)];
            }
        }
        min
    }

    /// Logically removes `row` and `col` by overwriting them with infinity
    /// and decrements `real_size`.
    pub fn delete_row_and_column(&mut self, row: Vertex, col: Vertex) {
        assert!(self.real_size > 0);

        for i in self.matrix.vertices() {
            self.matrix[(row, i)] = Cost::INFINITY;
            self.matrix[(i, col)] = Cost::INFINITY;
        }

        self.real_size -= 1;
    }
}

impl Index<(Vertex, Vertex)> for ReducedMatrix {
    type Output = Cost;

    fn index(&self, cell: (Vertex, Vertex)) -> &Cost {
        &self.matrix[cell]
    }
}

impl IndexMut<(Vertex, Vertex)> for ReducedMatrix {
    fn index_mut(&mut self, cell: (Vertex, Vertex)) -> &mut Cost {
        &mut self.matrix[cell]
    }
}

impl InvariantCheck<ReductionInvariantError> for ReducedMatrix {
    fn is_correct(&self) -> Result<(), ReductionInvariantError> {
        for row in self.matrix.vertices() {
            let min = self.min_in_row(row, None);
            if min != 0.0 && min.is_finite() {
                return Err(ReductionInvariantError::UnreducedRow(row));
            }
        }

        for col in self.matrix.vertices() {
            let min = self.min_in_column(col, None);
            if min != 0.0 && min.is_finite() {
                return Err(ReductionInvariantError::UnreducedColumn(col));
            }
        }

        Ok(())
    }
}
