pub mod matrix_reader;
pub use matrix_reader::{MatrixReadable, MatrixReader};

pub mod tour_writer;
pub use tour_writer::TourWriter;

pub mod dot_writer;
pub use dot_writer::{try_write_dot_with_tour, DotWriter};
