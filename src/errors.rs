use std::error::Error;

use thiserror::Error;

use crate::graph::Vertex;

/// Trait for checking invariants in datastructures
pub trait InvariantCheck<E: Error> {
    fn is_correct(&self) -> Result<(), E>;
}

/// Violations of the solver's input contract, detected when a matrix is
/// constructed or loaded. The search itself assumes a validated matrix.
#[derive(Debug, Error, PartialEq)]
pub enum InvalidMatrixError {
    #[error("row {row} has {found} entries, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("negative or NaN cost {value} at ({row}, {col})")]
    NegativeCost { row: Vertex, col: Vertex, value: f64 },

    #[error("diagonal entry ({vertex}, {vertex}) must be infinite")]
    FiniteDiagonal { vertex: Vertex },
}

/// Violations of the reduction invariant: after a reduction, every active row
/// and column must contain a zero or be entirely infinite.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReductionInvariantError {
    #[error("active row {0} contains no zero after reduction")]
    UnreducedRow(Vertex),

    #[error("active column {0} contains no zero after reduction")]
    UnreducedColumn(Vertex),
}
