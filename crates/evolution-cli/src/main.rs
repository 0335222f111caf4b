//! evolution-cli: Evolution API command-line client
//!
//! Usage:
//!   evolution-cli instances            - List instances
//!   evolution-cli send-text <n> <msg>  - Send a text through EVOLUTION_INSTANCE
//!   evolution-cli --help               - Show help

mod cli;

use std::process::ExitCode;

use evolution_client::{ClientConfig, EvolutionClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let command = match cli::parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Run 'evolution-cli --help' for usage.");
            return Ok(ExitCode::from(2));
        }
    };

    if !command.needs_client() {
        return Ok(exit_code(cli::run_offline(&command)));
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    let config = ClientConfig::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;
    let client = EvolutionClient::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Failed to create Evolution client: {}", e))?;

    let succeeded = cli::run(command, &client, config.instance.as_deref()).await?;
    Ok(exit_code(succeeded))
}

fn exit_code(succeeded: bool) -> ExitCode {
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
