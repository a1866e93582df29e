use crate::arguments::Args;
use crate::configuration::Configuration;
use crate::io::output;
use crate::order::{self, OrderTable};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// The names of the four output files for cutoff radius `r_max`, in the order
/// they are computed.
pub fn output_names(r_max: f64) -> [String; 4] {
    [format!("Freud_rc{}_q4q6w4w6.txt", r_max),
     format!("Freud_rc{}_avq4avq6avw4avw6.txt", r_max),
     String::from("Freud_MSM_q4q6w4w6.txt"),
     String::from("Freud_MSM_avq4avq6avw4avw6.txt")]
}

/// Loads the configuration named in `args`, centering it if asked.
pub fn load(args: &Args) -> Result<Configuration> {
    let config = args.file_type
                     .format()
                     .read(Path::new(&args.file))
                     .with_context(|| format!("Failed to load {}.", args.file))?;
    info!(file = %args.file, particles = config.len(), reduced_box = ?config.reduced_box.as_array(),
          "Loaded configuration.");
    if args.center {
        Ok(config.centered())
    } else {
        Ok(config)
    }
}

/// The four tables: cutoff then Voronoi neighbours, each unaveraged then
/// averaged.
pub fn compute_all(config: &Configuration, args: &Args) -> Result<Vec<OrderTable>> {
    let mut tables = Vec::with_capacity(4);
    for (weighted, average) in [(false, false), (false, true), (true, false), (true, true)] {
        let table = order::compute_qls_and_neighbors(config,
                                                     average,
                                                     weighted,
                                                     args.r_max,
                                                     args.threads,
                                                     args.silent)?;
        tables.push(table);
    }
    Ok(tables)
}

/// Runs the full analysis of `args.file` and writes the four tables into the
/// directory of the input file. Nothing is written unless every table is
/// computed, and a failed write leaves none of the four behind. Returns the
/// paths written.
pub fn run(args: &Args) -> Result<Vec<PathBuf>> {
    let config = load(args)?;
    let tables = compute_all(&config, args)?;
    let dir = Path::new(&args.file).parent()
                                   .map(Path::to_path_buf)
                                   .unwrap_or_default();
    let files = tables.iter()
                      .zip(output_names(args.r_max).iter())
                      .map(|(table, name)| (output::table_file(table), dir.join(name)))
                      .collect::<Vec<(String, PathBuf)>>();
    output::write_all(&files).with_context(|| {
                                  format!("Failed to write the results to {}.",
                                          dir.display())
                              })?;
    Ok(files.into_iter().map(|(_, path)| path).collect())
}
