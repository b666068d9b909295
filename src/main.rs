//! Main entry point for the fraglog CLI application.

use clap::Parser;
use fraglog::{app::App, cli::Args, error::Result};

fn main() -> Result<()> {
    let args = Args::parse();
    let config = fraglog::cli::Config::from_args(args)?;

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .parse_default_env()
        .init();

    let app = App::new(config);
    app.run()
}
