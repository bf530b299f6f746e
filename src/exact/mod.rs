pub mod branch_and_bound;
pub mod naive;
pub mod reduced_matrix;
pub mod search_tree;
pub mod trace;

pub use branch_and_bound::*;
pub use reduced_matrix::*;
pub use search_tree::*;
pub use trace::*;
