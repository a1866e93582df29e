use crate::configuration::Configuration;
use crate::errors::{BoxError, LoadError, ParseError};
use crate::io::{parse_count, parse_float, parse_position, FileFormat};
use crate::lattice::ReducedBox;
use crate::utils;

/// The extended XYZ snapshot format.
///
/// > N
/// > Lattice="ax ay az bx by bz cx cy cz" [other key=value pairs]
/// > species x y z [ignored ...]
/// > ...
///
/// The lattice vectors a, b and c are rows. Positions are mapped through
/// fractional coordinates into the frame of the reduced box, so a rotated
/// cell gives the same configuration as its upper triangular form.
pub struct Xyz {}

impl Xyz {
    /// Finds the Lattice="..." entry of the comment line and returns its
    /// vectors as rows.
    fn parse_lattice(line: Option<&str>) -> Result<[[f64; 3]; 3], ParseError> {
        let line = line.unwrap_or("");
        // ascii lowercasing keeps the byte offsets of the original line
        let start = match line.to_ascii_lowercase().find("lattice=\"") {
            Some(i) => i + "lattice=\"".len(),
            None => return Err(ParseError::MissingLattice),
        };
        let end = match line[start..].find('"') {
            Some(i) => start + i,
            None => return Err(ParseError::MissingLattice),
        };
        let values = line[start..end].split_whitespace()
                                     .map(|token| parse_float(token, 2))
                                     .collect::<Result<Vec<f64>, ParseError>>()?;
        if values.len() != 9 {
            return Err(ParseError::BoxLength(values.len()));
        }
        Ok([[values[0], values[1], values[2]],
            [values[3], values[4], values[5]],
            [values[6], values[7], values[8]]])
    }
}

impl FileFormat for Xyz {
    fn parse(&self, raw: &str) -> Result<Configuration, LoadError> {
        let mut lines = raw.lines();
        let n = parse_count(lines.next())?;
        let rows = Self::parse_lattice(lines.next())?;
        // the reducer takes the edge vectors as columns
        let mut matrix = [[0f64; 3]; 3];
        for (i, row) in rows.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                matrix[j][i] = *value;
            }
        }
        let reduced_box = ReducedBox::reduce(matrix)?;
        let to_fractional =
            utils::invert_lattice(&rows).map_err(|_| BoxError::Singular)?;
        let to_reduced = reduced_box.to_cartesian();
        let mut positions = Vec::with_capacity(n);
        for i in 0..n {
            let line = match lines.next() {
                Some(line) => line,
                None => return Err(ParseError::MissingPositions(n, i).into()),
            };
            // skip the species
            let position = parse_position(line.split_whitespace().skip(1), i + 3)?;
            let fractional = utils::dot(position, to_fractional);
            positions.push(utils::dot(fractional, to_reduced));
        }
        Ok(Configuration::new(reduced_box, positions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xyz_parse() {
        let raw = "2\nLattice=\"4 0 0 0 5 0 0 0 6\" Properties=species:S:1:pos:R:3\n\
                   A 0 0 0\nB 1 2 3 0.5\n";
        let config = Xyz {}.parse(raw).unwrap();
        assert_eq!(config.reduced_box.as_array(), [4., 5., 6., 0., 0., 0.]);
        assert_eq!(config.positions, vec![[0., 0., 0.], [1., 2., 3.]]);
    }

    #[test]
    fn xyz_parse_rotated() {
        // the x and y axes are swapped by a rotation about z
        let raw = "1\nLattice=\"0 3 0 -4 0 0 0 0 5\"\nA 0.5 1.0 2.0\n";
        let config = Xyz {}.parse(raw).unwrap();
        let expected = [3., 4., 5., 0., 0., 0.];
        for (a, b) in config.reduced_box.as_array().iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12)
        }
        let expected = [1.0, -0.5, 2.0];
        for (a, b) in config.positions[0].iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12)
        }
    }

    #[test]
    fn xyz_parse_non_ascii_comment() {
        let raw = "1\nİİİ Lattice=\"4 0 0 0 5 0 0 0 6\" ünïcode=1\nA 1 1 1\n";
        let config = Xyz {}.parse(raw).unwrap();
        assert_eq!(config.reduced_box.as_array(), [4., 5., 6., 0., 0., 0.]);
        assert_eq!(config.positions, vec![[1., 1., 1.]]);
    }

    #[test]
    fn xyz_parse_missing_lattice() {
        let raw = "1\nProperties=species:S:1:pos:R:3\nA 0 0 0\n";
        assert!(matches!(Xyz {}.parse(raw),
                         Err(LoadError::Parse(ParseError::MissingLattice))));
    }

    #[test]
    fn xyz_parse_short_lattice() {
        let raw = "1\nLattice=\"4 0 0 0 5 0\"\nA 0 0 0\n";
        assert!(matches!(Xyz {}.parse(raw),
                         Err(LoadError::Parse(ParseError::BoxLength(6)))));
    }
}
