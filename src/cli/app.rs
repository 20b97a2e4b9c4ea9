use super::commands::{ConfigCommands, ReplayCommands, ScreensCommands};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "phone-shell")]
#[command(about = "Drive the phone shell's view navigation stack from the command line")]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log to stderr instead of phone-shell.log
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a navigation script against the demo screens
    Replay(ReplayCommands),
    /// List the demo screen catalog
    Screens(ScreensCommands),
    /// Inspect or write the configuration
    Config(ConfigCommands),
}
