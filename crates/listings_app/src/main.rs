mod cli;
mod platform;

use clap::Parser;

use crate::cli::Cli;
use crate::platform::config::load_config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;
    cli.apply_overrides(&mut config);
    platform::logging::initialize(&config.log);
    platform::run_app(config)
}
