mod cli;
mod color;
mod config;
mod data;
mod error;
mod pipeline;
mod reduce;
mod render;

use anyhow::Context;
use clap::Parser;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let invocation = cli.invocation().unwrap_or_else(|e| e.exit());
    let config = cli.run_config().context("resolving configuration")?;

    let summary = pipeline::run(&invocation, &config)?;
    log::debug!(
        "{} plot of {} points ({}x{}) at {}",
        if summary.annotated { "Annotated" } else { "Plain" },
        summary.points,
        summary.image_size.0,
        summary.image_size.1,
        summary.output.display()
    );
    Ok(())
}
