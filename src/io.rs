use crate::configuration::Configuration;
use crate::errors::{LoadError, ParseError};
use std::path::Path;

pub mod dat;
pub mod output;
pub mod xyz;

/// The supported configuration file types.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FileType {
    /// Particle count, box and positions as plain numbers.
    Dat,
    /// Extended XYZ snapshot with a Lattice="..." header.
    Xyz,
}

impl FileType {
    /// Infers the file type from the file name, defaulting to [`FileType::Dat`].
    pub fn infer(filename: &str) -> Self {
        if filename.to_lowercase().ends_with(".xyz") {
            Self::Xyz
        } else {
            Self::Dat
        }
    }

    /// The reader for this file type.
    pub fn format(&self) -> Box<dyn FileFormat> {
        match self {
            Self::Dat => Box::new(dat::Dat {}),
            Self::Xyz => Box::new(xyz::Xyz {}),
        }
    }
}

/// FileFormat trait. Used for handling input from the different file types.
pub trait FileFormat {
    /// Builds a [`Configuration`] from the contents of a file.
    fn parse(&self, raw: &str) -> Result<Configuration, LoadError>;

    /// Reads and parses a file.
    fn read(&self, filename: &Path) -> Result<Configuration, LoadError> {
        let raw = std::fs::read_to_string(filename)?;
        self.parse(&raw)
    }
}

/// Parses the first 3 tokens of a line as a position.
///
/// * `tokens`: The whitespace separated tokens of the line, extra tokens are
///             ignored.
/// * `line_number`: 1-indexed line number for error messages.
pub(crate) fn parse_position<'a, I>(tokens: I,
                                    line_number: usize)
                                    -> Result<[f64; 3], ParseError>
    where I: Iterator<Item = &'a str>
{
    let mut position = [0f64; 3];
    let mut found = 0;
    for (p, token) in position.iter_mut().zip(tokens) {
        *p = parse_float(token, line_number)?;
        found += 1;
    }
    if found < 3 {
        return Err(ParseError::ShortPosition(line_number, found));
    }
    Ok(position)
}

/// Parses a token as a float.
pub(crate) fn parse_float(token: &str,
                          line_number: usize)
                          -> Result<f64, ParseError> {
    token.parse::<f64>().map_err(|_| {
        ParseError::Unparsable(line_number, String::from(token))
    })
}

/// Parses the particle count line.
pub(crate) fn parse_count(line: Option<&str>)
                          -> Result<usize, ParseError> {
    let line = line.unwrap_or("").trim();
    match line.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::ParticleCount(String::from(line))),
    }
}
