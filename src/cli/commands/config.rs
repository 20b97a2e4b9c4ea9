use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::Path;

use phone_shell::config::ShellConfig;

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file location
    Path,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle config command; `config_path` overrides the default location
pub fn handle_config_command(cmd: ConfigCommands, config_path: Option<&Path>) -> Result<()> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => ShellConfig::get_config_path()?,
    };

    match cmd.command {
        ConfigSubcommands::Show => {
            let config = ShellConfig::load_from(&path)?;
            if !path.exists() {
                println!("{}", format!("# {} not found, showing defaults", path.display()).dimmed());
            }
            print!("{}", config.to_toml()?);
        }
        ConfigSubcommands::Path => {
            println!("{}", path.display());
        }
        ConfigSubcommands::Init { force } => init_config(&path, force)?,
    }

    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    ShellConfig::default().save_to(path)?;
    println!("{} Wrote default config to {}", "✓".bright_green().bold(), path.display().to_string().cyan());
    Ok(())
}
