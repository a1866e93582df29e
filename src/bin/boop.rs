use anyhow::Result;
use boop::arguments::{Args, ClapApp};
use boop::driver;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // diagnostics go to stderr, RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("boop=info"));
    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(std::io::stderr)
                             .init();
    // argument parsing
    let app = ClapApp::App.get();
    let args = Args::new(app.get_matches());
    // print splash
    println!("Bond Orientational Order Parameters ({})",
             env!("CARGO_PKG_VERSION"));
    let paths = driver::run(&args)?;
    for path in paths {
        println!("Saved to {}", path.display());
    }
    Ok(())
}
