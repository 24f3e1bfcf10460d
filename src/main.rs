use clap::Parser;
use uno::config::{Cli, ServerConfig};
use uno::logging;
use uno::uno_game::api::start_api_server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_cli(Cli::parse())?;
    logging::init(&config.log_level);

    start_api_server(config).await
}
