use std::io::Write;

use crate::graph::Tour;

/// Writes a tour in the 1-based output format: the total cost followed by
/// one `begin end cost` line per edge.
pub trait TourWriter {
    fn try_write_tour<W: Write>(&self, writer: W) -> anyhow::Result<()>;
}

impl TourWriter for Tour {
    fn try_write_tour<W: Write>(&self, writer: W) -> anyhow::Result<()> {
        self.write(writer)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::Edge;

    #[test]
    fn writes_cost_then_edges() {
        let mut tour = Tour::new();
        tour.push(Edge::new(0, 2, 5.0));
        tour.push(Edge::new(2, 1, 2.0));
        tour.push(Edge::new(1, 0, 3.0));

        let mut buffer: Vec<u8> = Vec::new();
        tour.try_write_tour(&mut buffer).unwrap();

        assert_eq!(buffer, b"10\n1 3 5\n3 2 2\n2 1 3\n");
    }
}
