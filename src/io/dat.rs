use crate::configuration::Configuration;
use crate::errors::{LoadError, ParseError};
use crate::io::{parse_count, parse_float, parse_position, FileFormat};
use crate::lattice::ReducedBox;

/// The plain configuration format.
///
/// > N
/// > Lx Ly Lz | m00 m01 m02 m10 m11 m12 m20 m21 m22
/// > x y z [ignored ...]
/// > ...
///
/// A 9 number box is a row-major matrix whose columns are the box edge
/// vectors. Positions are returned exactly as written, in a [0, L) frame for
/// files written by most simulation codes.
pub struct Dat {}

impl Dat {
    /// Reads the box line into a [`ReducedBox`].
    fn parse_box(line: Option<&str>) -> Result<ReducedBox, LoadError> {
        let values = line.unwrap_or("")
                         .split_whitespace()
                         .map(|token| parse_float(token, 2))
                         .collect::<Result<Vec<f64>, ParseError>>()?;
        let reduced_box = match values.len() {
            3 => ReducedBox::from_lengths(values[0], values[1], values[2])?,
            9 => ReducedBox::reduce([[values[0], values[1], values[2]],
                                     [values[3], values[4], values[5]],
                                     [values[6], values[7], values[8]]])?,
            n => return Err(ParseError::BoxLength(n).into()),
        };
        Ok(reduced_box)
    }
}

impl FileFormat for Dat {
    fn parse(&self, raw: &str) -> Result<Configuration, LoadError> {
        let mut lines = raw.lines();
        let n = parse_count(lines.next())?;
        let reduced_box = Self::parse_box(lines.next())?;
        let mut positions = Vec::with_capacity(n);
        for i in 0..n {
            let line = match lines.next() {
                Some(line) => line,
                None => return Err(ParseError::MissingPositions(n, i).into()),
            };
            positions.push(parse_position(line.split_whitespace(), i + 3)?);
        }
        Ok(Configuration::new(reduced_box, positions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BoxError;

    #[test]
    fn dat_parse_lengths() {
        let raw = "2\n4.0 5.0 6.0\n0 0 0\n1 2 3 extra\n";
        let config = Dat {}.parse(raw).unwrap();
        assert_eq!(config.reduced_box.as_array(), [4., 5., 6., 0., 0., 0.]);
        assert_eq!(config.positions, vec![[0., 0., 0.], [1., 2., 3.]]);
    }

    #[test]
    fn dat_parse_matrix() {
        let raw = "1\n4 2 0 0 4 0 0 0 4\n1 1 1\n";
        let config = Dat {}.parse(raw).unwrap();
        let [lx, ly, lz, xy, xz, yz] = config.reduced_box.as_array();
        assert_eq!([lx, ly, lz], [4., 4., 4.]);
        assert_eq!([xy, xz, yz], [0.5, 0., 0.]);
        // positions are not moved into the reduced frame
        assert_eq!(config.positions, vec![[1., 1., 1.]]);
    }

    #[test]
    fn dat_parse_bad_box_length() {
        let raw = "1\n4 4 4 4\n1 1 1\n";
        assert!(matches!(Dat {}.parse(raw),
                         Err(LoadError::Parse(ParseError::BoxLength(4)))));
    }

    #[test]
    fn dat_parse_bad_box_token() {
        let raw = "1\n4 four 4\n1 1 1\n";
        assert!(matches!(Dat {}.parse(raw),
                         Err(LoadError::Parse(ParseError::Unparsable(2, _)))));
    }

    #[test]
    fn dat_parse_degenerate_box() {
        let raw = "1\n1 2 0 0 0 0 0 0 3\n1 1 1\n";
        assert!(matches!(Dat {}.parse(raw),
                         Err(LoadError::Box(BoxError::ParallelEdges))));
    }

    #[test]
    fn dat_parse_missing_positions() {
        let raw = "3\n4 4 4\n1 1 1\n2 2 2\n";
        assert!(matches!(Dat {}.parse(raw),
                         Err(LoadError::Parse(ParseError::MissingPositions(3, 2)))));
    }

    #[test]
    fn dat_parse_short_position() {
        let raw = "2\n4 4 4\n1 1 1\n2 2\n";
        assert!(matches!(Dat {}.parse(raw),
                         Err(LoadError::Parse(ParseError::ShortPosition(4, 2)))));
    }

    #[test]
    fn dat_parse_bad_count() {
        let raw = "-2\n4 4 4\n1 1 1\n";
        assert!(matches!(Dat {}.parse(raw),
                         Err(LoadError::Parse(ParseError::ParticleCount(_)))));
    }
}
