use std::path::PathBuf;

use clap::Parser;

use subtrack::config::ConfigLoader;
use subtrack::logger::init_logger;
use subtrack::server::Server;

/// Subscription tracking service
#[derive(Debug, Parser)]
#[command(name = "subtrack", version, long_version = subtrack::clap_long_version())]
struct Cli {
    /// Directory holding default.toml and the environment overlays
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loader = match cli.config_dir {
        Some(dir) => ConfigLoader::with_config_dir(dir),
        None => ConfigLoader::new()?,
    };
    let settings = loader.load()?;

    init_logger(&settings.logger)?;

    Server::new(settings).run().await
}
