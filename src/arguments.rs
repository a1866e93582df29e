use crate::io::FileType;
use clap::{crate_authors, crate_version, Arg, ArgAction, ArgMatches, Command};

/// The default cutoff radius for neighbour searches.
pub const DEFAULT_R_MAX: f64 = 1.4;

/// Create a container for dealing with clap and being able to test arg parsing
pub enum ClapApp {
    App,
}

impl ClapApp {
    /// Create and return the clap::Command
    pub fn get(&self) -> Command<'static> {
        Command::new("Bond Orientational Order Parameters")
            .author(crate_authors!())
            .version(crate_version!())
            .arg(Arg::new("file")
                .required(true)
                .index(1)
                .help("The configuration file to analyse."))
            .arg(Arg::new("rmax")
                .short('r')
                .long("rmax")
                .takes_value(true)
                .value_parser(clap::value_parser!(f64))
                .default_value("1.4")
                .help("Cutoff radius for the neighbour search.")
                .long_help(
"Particles closer than this radius are neighbours when computing the cutoff
order parameters. It must be less than half the smallest distance between
opposite faces of the box. The value also names the cutoff output files."))
            .arg(Arg::new("file type")
                .short('t')
                .long("type")
                .takes_value(true)
                .value_parser(["dat", "xyz"])
                .help("The file type of the configuration.")
                .long_help(
"The file type of the input file. If this is not supplied the type will be
infered from the filename, files ending in .xyz are read as extended XYZ
and everything else as a plain configuration file."))
            .arg(Arg::new("center")
                .short('c')
                .long("center")
                .action(ArgAction::SetTrue)
                .help("Shift the positions by half the box lengths.")
                .long_help(
"Subtracts half of each box edge length from every position after loading,
moving a configuration written in [0, L) onto one centred on the origin."))
            .arg(Arg::new("threads")
                .short('J')
                .long("threads")
                .takes_value(true)
                .value_parser(clap::value_parser!(usize))
                .default_value("0")
                .help("Number of threads to distribute the calculation over.")
                .long_help(
"The number of threads to be used by the program. A default value of 0 is used
to allow the program to best decide how to use the available hardware."))
            .arg(Arg::new("silent")
                .short('s')
                .long("silent")
                .action(ArgAction::SetTrue)
                .help("Hide the progress bars."))
    }
}

/// Holds the arguments passed to the program from the command-line
#[derive(Clone, Debug, PartialEq)]
pub struct Args {
    pub file: String,
    pub file_type: FileType,
    pub r_max: f64,
    pub center: bool,
    pub threads: usize,
    pub silent: bool,
}

impl Args {
    /// Initialises the structure from the command-line arguments.
    pub fn new(arguments: ArgMatches) -> Self {
        let file = match arguments.get_one::<String>("file") {
            Some(f) => f.clone(),
            None => String::new(),
        };
        let file_type = match arguments.get_one::<String>("file type")
                                       .map(|s| s.as_str())
        {
            Some("xyz") => FileType::Xyz,
            Some(_) => FileType::Dat,
            None => FileType::infer(&file),
        };
        // rmax and threads have default values
        let r_max = arguments.get_one::<f64>("rmax")
                             .copied()
                             .unwrap_or(DEFAULT_R_MAX);
        let threads = arguments.get_one::<usize>("threads")
                               .copied()
                               .unwrap_or(0);
        let center = *arguments.get_one::<bool>("center").unwrap_or(&false);
        let silent = *arguments.get_one::<bool>("silent").unwrap_or(&false);
        Self { file,
               file_type,
               r_max,
               center,
               threads,
               silent }
    }
}
