pub mod disjoint_set;
pub mod signal_handling;

pub use disjoint_set::*;
