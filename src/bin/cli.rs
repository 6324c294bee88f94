// src/bin/cli.rs
use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};

use or_scrape::cli::{self, Args};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    or_scrape::log::init(args.verbose);

    let summary = cli::run(args).wrap_err("scrape run failed")?;
    if !summary.is_success() {
        let names: Vec<&str> = summary.failed.iter().map(|(c, _)| c.as_str()).collect();
        bail!("{} categories failed: {}", names.len(), names.join(", "));
    }
    Ok(())
}
