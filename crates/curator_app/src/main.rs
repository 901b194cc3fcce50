mod app;
mod cli;
mod config;
mod effects;
mod logging;
mod persistence;
mod render;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logging::initialize(cli.log);
    app::run(cli)
}
