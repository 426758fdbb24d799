//! CLI entry point - the composition root.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use toolgate_cli::{Cli, CliConfig, Commands, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = if verbose {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve(args) => handlers::serve::execute(&args).await,
        command => {
            let ctx = bootstrap(CliConfig {
                url: cli.url,
                data_dir: cli.data_dir,
            })
            .await?;
            handlers::dispatch(&ctx, command).await
        }
    }
}
