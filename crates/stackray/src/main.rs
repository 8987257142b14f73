//! stackray - recovers stack-resident function parameters
//!
//! Usage:
//!   stackray <listing> <function>       Analyze one function
//!   stackray <listing> <function> -v    Same, with debug logging

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use stackray_analysis::Function;

mod listing;

use listing::ListingFile;

#[derive(Parser)]
#[command(name = "stackray")]
#[command(
    about = "Recovers stack-resident function parameters from a disassembly listing",
    long_about = None
)]
struct Cli {
    /// Path to the disassembly listing (objdump-style, Intel syntax)
    listing: PathBuf,

    /// Name of the function to analyze
    function: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .init();

    let listing = ListingFile::open(&cli.listing)
        .with_context(|| format!("reading listing {}", cli.listing.display()))?;
    if listing.is_empty() {
        log::warn!("no function headers found in {}", cli.listing.display());
    }
    log::debug!("listing has {} functions", listing.len());

    let mut function = Function::load(&listing, &cli.function)
        .with_context(|| format!("loading function {:?}", cli.function))?;
    log::debug!("decoded {} instructions", function.instructions().len());

    function
        .decompile()
        .with_context(|| format!("analyzing function {:?}", cli.function))?;

    for diag in function.diagnostics() {
        log::warn!("{diag}");
    }

    println!("{function}");
    Ok(())
}
