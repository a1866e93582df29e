use std::fmt::{Debug, Display};

/// Error for malformed configuration files.
pub enum ParseError {
    /// The first line isn't a positive integer.
    /// ParticleCount(line)
    ParticleCount(String),
    /// The box line has neither 3 nor 9 entries.
    /// BoxLength(supplied)
    BoxLength(usize),
    /// A value couldn't be parsed as a float.
    /// Unparsable(line number, token)
    Unparsable(usize, String),
    /// The file ended before all the positions were read.
    /// MissingPositions(expected, found)
    MissingPositions(usize, usize),
    /// A position line has fewer than 3 entries.
    /// ShortPosition(line number, supplied)
    ShortPosition(usize, usize),
    /// The snapshot header has no Lattice="..." entry.
    MissingLattice,
    /// Failed to read the file.
    Io(std::io::Error),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParticleCount(line) => write!(
                f,
                "The particle count \"{}\" is not a positive integer.",
                line
            ),
            Self::BoxLength(supplied) => write!(
                f,
                "Box information has {} elements, expected either 3 or 9.",
                supplied
            ),
            Self::Unparsable(line, token) => write!(
                f,
                "The value \"{}\" on line {} is unparsable as a float.",
                token, line
            ),
            Self::MissingPositions(expected, found) => write!(
                f,
                "Expected {} positions but the file ended after {}.",
                expected, found
            ),
            Self::ShortPosition(line, supplied) => write!(
                f,
                "Position on line {} has {} values, at least 3 are required.",
                line, supplied
            ),
            Self::MissingLattice => {
                write!(f, "No Lattice=\"...\" entry in the snapshot header.")
            }
            Self::Io(e) => write!(f, "Unable to read file: {}", e),
        }
    }
}

impl Debug for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::error::Error for ParseError {}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Error for a box matrix that cannot be reduced to a right-handed
/// triclinic box.
pub enum BoxError {
    /// A reduced edge length is zero, negative or not a number.
    /// NonPositiveLength(axis, value)
    NonPositiveLength(char, f64),
    /// The first two edge vectors are parallel.
    ParallelEdges,
    /// The box doesn't span 3D space.
    Singular,
}

impl Display for BoxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveLength(axis, value) => write!(
                f,
                "Degenerate box: L{} = {} is not a positive length, is the box matrix right-handed?",
                axis, value
            ),
            Self::ParallelEdges => write!(
                f,
                "Degenerate box: the first two edge vectors are parallel."
            ),
            Self::Singular => {
                write!(f, "Degenerate box: the box has zero volume.")
            }
        }
    }
}

impl Debug for BoxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::error::Error for BoxError {}

/// Error for loading a configuration, raised by either the parser or the box
/// reduction.
pub enum LoadError {
    Parse(ParseError),
    Box(BoxError),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{}", e),
            Self::Box(e) => write!(f, "{}", e),
        }
    }
}

impl Debug for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::error::Error for LoadError {}

impl From<ParseError> for LoadError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<BoxError> for LoadError {
    fn from(e: BoxError) -> Self {
        Self::Box(e)
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Parse(ParseError::Io(e))
    }
}

/// Error for a Voronoi tessellation that cannot be built.
pub enum TessellationError {
    /// There are no particles to tessellate.
    Empty,
    /// Two particles sit on top of each other.
    /// Coincident(particle, particle)
    Coincident(usize, usize),
    /// The cell of a particle isn't closed by the planes of its neighbours.
    /// Unbounded(particle)
    Unbounded(usize),
    /// The cells don't fill the box.
    /// VolumeMismatch(sum of cells, box volume)
    VolumeMismatch(f64, f64),
}

impl Display for TessellationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => {
                write!(f, "Cannot tessellate a configuration with no particles.")
            }
            Self::Coincident(i, j) => write!(
                f,
                "Particles {} and {} are coincident, their Voronoi cells are undefined.",
                i, j
            ),
            Self::Unbounded(i) => write!(
                f,
                "The Voronoi cell of particle {} is not closed by its neighbours.",
                i
            ),
            Self::VolumeMismatch(cells, volume) => write!(
                f,
                "The Voronoi cells fill {} of the box volume {}.",
                cells, volume
            ),
        }
    }
}

impl Debug for TessellationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::error::Error for TessellationError {}

/// Error for an invalid neighbour query.
pub enum QueryError {
    /// The cutoff isn't a positive number.
    NonPositiveCutoff(f64),
    /// The cutoff would reach a second image of the same particle.
    /// CutoffTooLarge(cutoff, maximum)
    CutoffTooLarge(f64, f64),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveCutoff(r) => {
                write!(f, "The cutoff radius ({}) must be positive.", r)
            }
            Self::CutoffTooLarge(r, max) => write!(
                f,
                "The cutoff radius ({}) must be less than half the smallest box plane distance ({}).",
                r, max
            ),
        }
    }
}

impl Debug for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::error::Error for QueryError {}

/// Error for an order parameter request that doesn't fit the configuration.
pub enum OrderError {
    /// The neighbour list was built for a different number of particles.
    /// Mismatch(configuration, neighbour list)
    Mismatch(usize, usize),
    /// The degree is beyond the range of the Wigner 3j factorials.
    /// DegreeTooLarge(degree, maximum)
    DegreeTooLarge(usize, usize),
}

impl Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mismatch(particles, neighbours) => write!(
                f,
                "The configuration has {} particles but the neighbour list was built for {}.",
                particles, neighbours
            ),
            Self::DegreeTooLarge(l, max) => write!(
                f,
                "Spherical harmonic degree {} is too large, the maximum is {}.",
                l, max
            ),
        }
    }
}

impl Debug for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::error::Error for OrderError {}
