use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind, Lines},
    path::Path,
};

use crate::graph::{Cost, NumVertices, SquareMatrix};

pub type Result<T> = std::io::Result<T>;

/// Reads a complete asymmetric instance from the text format
///
/// ```text
/// c optional comments
/// p tsp 3
/// -  10 15
/// 5  -  9
/// 6  13 -
/// ```
///
/// where `-` or `inf` denote a missing edge (and the mandatory diagonal).
/// The loaded matrix is validated against the solver's input contract.
pub trait MatrixReadable: Sized {
    fn try_read_matrix<R: BufRead>(reader: R) -> Result<Self>;
    fn try_read_matrix_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

impl MatrixReadable for SquareMatrix {
    fn try_read_matrix<R: BufRead>(reader: R) -> Result<Self> {
        MatrixReader::try_new(reader)?.read_matrix()
    }

    fn try_read_matrix_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = File::open(path)?;
        let buf_reader = BufReader::new(reader);
        Self::try_read_matrix(buf_reader)
    }
}

pub struct MatrixReader<R> {
    lines: Lines<R>,
    number_of_vertices: NumVertices,
}

macro_rules! raise_error_unless {
    ($cond : expr, $kind : expr, $info : expr) => {
        if !($cond) {
            return Err(std::io::Error::new($kind, $info));
        }
    };
}

macro_rules! parse_next_value {
    ($iterator : expr, $name : expr) => {{
        let next = $iterator.next();
        raise_error_unless!(
            next.is_some(),
            ErrorKind::InvalidData,
            format!("Premature end of line when parsing {}.", $name)
        );

        let parsed = next.unwrap().parse();
        raise_error_unless!(
            parsed.is_ok(),
            ErrorKind::InvalidData,
            format!("Invalid value found. Cannot parse {}.", $name)
        );

        parsed.unwrap()
    }};
}

impl<R: BufRead> MatrixReader<R> {
    pub fn try_new(reader: R) -> Result<Self> {
        let mut matrix_reader = Self {
            lines: reader.lines(),
            number_of_vertices: 0,
        };

        matrix_reader.number_of_vertices = matrix_reader.parse_header()?;
        Ok(matrix_reader)
    }

    pub fn number_of_vertices(&self) -> NumVertices {
        self.number_of_vertices
    }

    /// Reads the cost rows and checks the input contract.
    pub fn read_matrix(mut self) -> Result<SquareMatrix> {
        let n = self.number_of_vertices;
        let mut matrix = SquareMatrix::new(n);

        for row in 0..n {
            let values = self.parse_row(row)?;
            for (col, value) in values.into_iter().enumerate() {
                matrix[(row, col as NumVertices)] = value;
            }
        }

        if let Err(e) = matrix.validate_costs() {
            return Err(std::io::Error::new(ErrorKind::InvalidData, e.to_string()));
        }

        Ok(matrix)
    }

    fn next_non_comment_line(&mut self) -> Result<Option<String>> {
        loop {
            let line = self.lines.next();
            match line {
                None => return Ok(None),
                Some(Err(x)) => return Err(x),
                Some(Ok(line)) if line.starts_with('c') => continue,
                Some(Ok(line)) if line.trim().is_empty() => continue,
                Some(Ok(line)) => return Ok(Some(line)),
            }
        }
    }

    fn parse_header(&mut self) -> Result<NumVertices> {
        let line = self.next_non_comment_line()?;

        raise_error_unless!(line.is_some(), ErrorKind::InvalidData, "No header found");
        let line = line.unwrap();

        let mut parts = line.split(' ').filter(|t| !t.is_empty());

        raise_error_unless!(
            parts.next().is_some_and(|t| t.starts_with('p')),
            ErrorKind::InvalidData,
            "Invalid header found; line should start with p"
        );

        raise_error_unless!(
            parts.next() == Some("tsp"),
            ErrorKind::InvalidData,
            "Invalid header found; file type should be \"tsp\""
        );

        let number_of_vertices = parse_next_value!(parts, "Header>Number of vertices");

        raise_error_unless!(
            parts.next().is_none(),
            ErrorKind::InvalidData,
            "Invalid header found; expected end of line"
        );

        Ok(number_of_vertices)
    }

    fn parse_row(&mut self, row: NumVertices) -> Result<Vec<Cost>> {
        let line = self.next_non_comment_line()?;
        raise_error_unless!(
            line.is_some(),
            ErrorKind::InvalidData,
            format!("Premature end of file; expected cost row {row}.")
        );

        let tokens = line.unwrap();
        let mut values = Vec::with_capacity(self.number_of_vertices as usize);

        for token in tokens.split_whitespace() {
            values.push(parse_cost(token).ok_or_else(|| {
                std::io::Error::new(
                    ErrorKind::InvalidData,
                    format!("Invalid cost {token:?} in row {row}."),
                )
            })?);
        }

        raise_error_unless!(
            values.len() == self.number_of_vertices as usize,
            ErrorKind::InvalidData,
            format!(
                "Row {row} has {} entries, expected {}.",
                values.len(),
                self.number_of_vertices
            )
        );

        Ok(values)
    }
}

fn parse_cost(token: &str) -> Option<Cost> {
    if token == "-" || token.eq_ignore_ascii_case("inf") {
        return Some(Cost::INFINITY);
    }
    token.parse::<Cost>().ok().filter(|c| c.is_finite())
}

#[cfg(test)]
mod test {
    use super::*;

    const DEMO_FILE: &str = "c TEST\np tsp 3\nc TEST\n-  10 15\n5 inf 9\n6 13 -\n";

    #[test]
    fn test_success() {
        let buf_reader = std::io::BufReader::new(DEMO_FILE.as_bytes());
        let matrix = SquareMatrix::try_read_matrix(buf_reader).unwrap();

        assert_eq!(matrix.number_of_vertices(), 3);
        assert_eq!(matrix[(0, 1)], 10.0);
        assert_eq!(matrix[(1, 2)], 9.0);
        assert!(matrix[(0, 0)].is_infinite());
        assert!(matrix[(1, 1)].is_infinite());
    }

    #[test]
    fn rejects_bad_header() {
        for input in ["p ds 3\n", "3\n", "p tsp 3 4\n", "p tsp x\n"] {
            let result = SquareMatrix::try_read_matrix(input.as_bytes());
            assert!(result.is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn rejects_short_row() {
        let input = "p tsp 3\n- 10 15\n5 -\n6 13 -\n";
        assert!(SquareMatrix::try_read_matrix(input.as_bytes()).is_err());
    }

    #[test]
    fn rejects_finite_diagonal() {
        let input = "p tsp 2\n0 1\n2 -\n";
        assert!(SquareMatrix::try_read_matrix(input.as_bytes()).is_err());
    }

    #[test]
    fn rejects_negative_cost() {
        let input = "p tsp 2\n- -1\n2 -\n";
        assert!(SquareMatrix::try_read_matrix(input.as_bytes()).is_err());
    }

    #[test]
    fn reads_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DEMO_FILE.as_bytes()).unwrap();

        let matrix = SquareMatrix::try_read_matrix_file(file.path()).unwrap();
        assert_eq!(matrix.number_of_vertices(), 3);
        assert_eq!(matrix[(2, 1)], 13.0);
    }
}
