// src/bin/cli.rs
use qualis_compare::cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    cli::run()
}
