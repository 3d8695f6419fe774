use std::error::Error;
use std::process;

use clap::Parser;
use log::{error, LevelFilter};
use simple_logger::SimpleLogger;

use chord::threads::commands::command_loop;
use chord::utils::cli::Cli;
use chord::utils::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = match Config::from_cli(Cli::parse()) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("Error: {}", message);
            process::exit(1);
        }
    };

    SimpleLogger::new()
        .env()
        .with_level(LevelFilter::Info)
        .init()
        .unwrap();

    let handle = match chord::start_node(config).await {
        Ok(handle) => handle,
        Err(err) => {
            error!("Failed to start node: {}", err);
            process::exit(1);
        }
    };

    command_loop(handle.node()).await;
    handle.shutdown().await;
    Ok(())
}
