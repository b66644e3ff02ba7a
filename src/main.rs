use clap::Parser;
use tracing_subscriber::EnvFilter;

use device_matcher::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.global.verbose {
        EnvFilter::new("device_matcher=debug,info")
    } else {
        EnvFilter::new("device_matcher=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Map(args) => {
            cli::map::run(args, &cli.global)?;
        }
        cli::Commands::Batch(args) => {
            cli::batch::run(args, &cli.global)?;
        }
        cli::Commands::Catalog(args) => {
            cli::catalog::run(args, &cli.global)?;
        }
    }

    Ok(())
}
