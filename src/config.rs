use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ShellConfig {
    #[serde(default)]
    pub transitions: TransitionSettings,
    #[serde(default)]
    pub base: BaseSettings,
    #[serde(default)]
    pub events: EventSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionSettings {
    /// Fixed delay before an animated hand-off settles
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseSettings {
    #[serde(default = "default_tabs")]
    pub tabs: Vec<String>,
    #[serde(default = "default_tab")]
    pub default_tab: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSettings {
    /// Broadcast buffer; slow subscribers lag past this
    #[serde(default = "default_event_capacity")]
    pub capacity: usize,
}

fn default_settle_delay_ms() -> u64 {
    300
}

fn default_tabs() -> Vec<String> {
    vec!["home".to_string(), "dialer".to_string(), "recents".to_string()]
}

fn default_tab() -> String {
    "home".to_string()
}

fn default_event_capacity() -> usize {
    64
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

impl Default for BaseSettings {
    fn default() -> Self {
        Self {
            tabs: default_tabs(),
            default_tab: default_tab(),
        }
    }
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            capacity: default_event_capacity(),
        }
    }
}

impl ShellConfig {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("phone-shell")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".phone-shell")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location; a missing file yields defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: ShellConfig = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {:?}", config_path))?;

        debug!(
            "Loaded config: settle delay {}ms, {} base tab(s)",
            config.transitions.settle_delay_ms,
            config.base.tabs.len()
        );
        Ok(config)
    }

    /// Save to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", config_path);

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)
                    .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
                info!("Created config directory: {:?}", config_dir);
            }
        }

        let config_content = self.to_toml()?;
        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    pub fn validate(&self) -> Result<()> {
        if self.base.tabs.is_empty() {
            bail!("base.tabs must name at least one tab");
        }
        if !self.base.tabs.contains(&self.base.default_tab) {
            bail!(
                "base.default_tab '{}' is not one of {:?}",
                self.base.default_tab,
                self.base.tabs
            );
        }
        if self.events.capacity == 0 {
            bail!("events.capacity must be greater than zero");
        }
        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.transitions.settle_delay_ms)
    }
}
