use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;

use cli::Cli;
use cli::app::Commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .parse_default_env()
            .init();
    } else {
        // Initialize logger to file (truncate on each run)
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open("phone-shell.log")?;
        env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .init();
    }

    info!("Starting phone-shell");

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Replay(replay_args) => {
            cli::commands::handle_replay_command(replay_args, config_path).await?;
        }
        Commands::Screens(screens_args) => {
            cli::commands::handle_screens_command(screens_args)?;
        }
        Commands::Config(config_args) => {
            cli::commands::handle_config_command(config_args, config_path)?;
        }
    }

    Ok(())
}
