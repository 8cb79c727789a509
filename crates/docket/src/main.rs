//! Command line interface for docket.

use std::path::PathBuf;

use clap::Parser;
use libdocket::{Docket, ensure_nightly};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Module references to document - package paths, workspace members,
    /// or registry packages, each optionally scoped with ::module::path
    #[arg(default_value = "./")]
    modules: Vec<String>,

    /// Directory the rendered documentation is written to
    #[arg(long, short, default_value = "html", env = "DOCKET_OUTPUT")]
    output: PathBuf,

    /// Output the documentation index as JSON instead of rendering HTML
    #[arg(long, default_value_t = false)]
    raw: bool,

    /// Document private items
    #[arg(long, default_value_t = false)]
    private: bool,

    /// Disable default features
    #[arg(long, default_value_t = false)]
    no_default_features: bool,

    /// Enable all features
    #[arg(long, default_value_t = false)]
    all_features: bool,

    /// Specify features to enable
    #[arg(long, value_delimiter = ',')]
    features: Vec<String>,

    /// Enable offline mode, ensuring Cargo will not use the network
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Enable quiet mode, disabling output while building docs
    #[arg(long, default_value_t = false)]
    quiet: bool,

    /// Open the rendered documentation in a browser afterwards
    #[arg(long, default_value_t = false)]
    open: bool,
}

/// Run one documentation build from parsed arguments.
fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let docket = Docket::new()
        .with_offline(cli.offline)
        .with_private_items(cli.private)
        .with_no_default_features(cli.no_default_features)
        .with_all_features(cli.all_features)
        .with_features(cli.features.clone())
        .with_silent(cli.quiet);

    if cli.raw {
        println!("{}", docket.raw_json(&cli.modules)?);
        return Ok(());
    }

    docket.generate(&cli.modules, &cli.output)?;

    if cli.open {
        opener::open(cli.output.join("index.html"))?;
    }

    Ok(())
}

/// Entry point: preflight the toolchain, then run the build.
fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = ensure_nightly() {
        eprintln!("{e}");
        std::process::exit(1);
    }

    if let Err(e) = run(&cli) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
