//! pulpcheck - integration checks for the Pulp 3 content API

use clap::Parser;

mod auth;
mod cli;
mod client;
mod config;
mod error;
mod fixtures;
mod output;
mod scenario;

use cli::{Cli, Commands, GlobalOptions};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match &cli.command {
        Commands::Run(args) => cli::run::run(&opts, args).await,
        Commands::Auth(args) => cli::auth::run(&opts, args).await,
        Commands::Status => cli::status::run(&opts),
        Commands::CleanArtifacts => cli::clean::run(&opts).await,
        Commands::Version => {
            println!("pulpcheck version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// `warn` by default, `debug` with --debug; RUST_LOG wins over both
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
