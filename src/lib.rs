//! A multi-threaded binary and library for computing local structural order
//! parameters of periodic particle configurations: the Steinhardt
//! bond-orientational order parameters q_l and ŵ_l
//! [Steinhardt, Nelson and Ronchetti 1983 Phys. Rev. B 28 784], their
//! neighbour averaged forms [Lechner and Dellago 2008 J. Chem. Phys. 129
//! 114707] and the Voronoi weighted Minkowski Structure Metrics
//! [Mickel et al. 2013 J. Chem. Phys. 138 044501].
//!
//! ### Supported Platforms
//! - Linux
//! - Os X
//! - Windows
//!
//! ## Installing the binary
//! ### From Source
//! ```sh
//! $ cargo build --verbose --release
//! ```
//! This will create the ./target/release/boop executable, from here you can
//! either move or link the binary to folder in your path. Building with
//! `--features voro` computes the Voronoi cells with voro++ (through voro_rs,
//! needs a C++ compiler) in place of the native plane clipping.
//!
//! ## Usage
//! The program takes a configuration file as input. The plain format is the
//! number of particles, a box line of either the three edge lengths or a
//! row-major 3x3 matrix whose columns are the edge vectors, then one position
//! per line.
//! ```text
//! 4
//! 1.0 1.0 1.0
//! 0.0 0.0 0.0
//! 0.5 0.5 0.0
//! 0.5 0.0 0.5
//! 0.0 0.5 0.5
//! ```
//! Extended XYZ snapshots with a Lattice="..." header are also read, the file
//! type is infered from the extension or set with the -t, --type flag.
//! ```sh
//! $ boop config.dat -r 1.4
//! ```
//! For a detailed list of usage options run
//! ```sh
//! $ boop --help
//! ```
//! ## Output
//! Four files are written next to the input file, one row per particle with
//! the columns q4 q6 ŵ4 ŵ6:
//! - Freud_rc{r}_q4q6w4w6.txt: neighbours within the cutoff radius.
//! - Freud_rc{r}_avq4avq6avw4avw6.txt: the same, neighbour averaged.
//! - Freud_MSM_q4q6w4w6.txt: Voronoi neighbours weighted by facet area.
//! - Freud_MSM_avq4avq6avw4avw6.txt: the same, neighbour averaged.
//!
//! Set RUST_LOG (eg. RUST_LOG=boop=debug) for more detailed logging.
//! ## License
//! MIT

/// For parsing command-line arguments.
pub mod arguments;
/// A periodic cell list for finding every particle image within a radius.
pub mod cell_list;
/// Contains [Configuration](configuration::Configuration), the box and
/// positions of the particles.
pub mod configuration;
/// Runs the full analysis of a configuration file and writes the results.
pub mod driver;
/// Provides custom errors types.
pub mod errors;
/// Spherical harmonics and Wigner 3j symbols.
pub mod harmonics;
/// Handles the File I/O for both the configuration files and result files.
/// Provides a [FileFormat](io::FileFormat) trait to be implemented by modules
/// designed to cover a specific file format.
pub mod io;
/// Contains [ReducedBox](lattice::ReducedBox) for reducing a box matrix to
/// lengths and tilt factors and for moving around the periodic box.
pub mod lattice;
/// Provides the [NeighborList](neighbors::NeighborList) and the cutoff and
/// Voronoi ways of building one.
pub mod neighbors;
/// Computes the order parameters from a neighbour list.
pub mod order;
/// Provides a thread-safe [Bar](progress::Bar) wrapper around indicatif.
pub mod progress;
/// Misc functions mainly for vector and matrix manipulation.
pub mod utils;
/// Builds the periodic Voronoi tessellation by clipping cells with bisector
/// planes.
pub mod voronoi;
