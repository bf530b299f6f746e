pub mod edge;
pub mod matrix;
pub mod random;
pub mod tour;

/// Index of a vertex of the input graph.
pub type Vertex = u32;
pub type NumVertices = Vertex;

/// Cost of an edge; `f64::INFINITY` encodes a missing edge (and the diagonal).
pub type Cost = f64;

/// Serializes a cost as a JSON number, or as the string `"inf"` for missing
/// edges; plain `f64` serialization turns infinities into `null`, which a
/// consumer cannot tell apart from an absent field.
pub fn serialize_cost<S: serde::Serializer>(cost: &Cost, serializer: S) -> Result<S::Ok, S::Error> {
    if cost.is_finite() {
        serializer.serialize_f64(*cost)
    } else {
        serializer.serialize_str("inf")
    }
}

pub use edge::*;
pub use matrix::*;
pub use random::*;
pub use tour::*;
