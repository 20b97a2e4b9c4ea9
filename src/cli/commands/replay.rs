//! Scripted navigation against the demo screens.
//!
//! A script is a TOML file with a list of steps:
//!
//! ```toml
//! [[steps]]
//! action = "open"
//! screen = "conversation"
//! params = { contact_id = "k1" }
//!
//! [[steps]]
//! action = "wait"
//! ms = 400
//!
//! [[steps]]
//! action = "back"
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::broadcast;

use phone_shell::config::ShellConfig;
use phone_shell::screens::register_demo_screens;
use phone_shell::shell::{NavError, NavEvent, NavOverview, Navigator, ScreenParams, VisualState};

#[derive(Args)]
pub struct ReplayCommands {
    /// Navigation script (TOML)
    pub script: PathBuf,

    /// Print one JSON object per step instead of colored text
    #[arg(long)]
    pub json: bool,

    /// Hide the overview printed after each step
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Open {
        screen: String,
        #[serde(default)]
        params: ScreenParams,
    },
    Back,
    Reset {
        #[serde(default)]
        tab: Option<String>,
    },
    Tab {
        tab: String,
    },
    Wait {
        ms: u64,
    },
    Settle,
}

impl Script {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse navigation script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Invalid script: {:?}", path))
    }
}

/// What one step did
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: usize,
    #[serde(flatten)]
    pub action: Step,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub events: Vec<NavEvent>,
    pub overview: NavOverview,
}

pub async fn handle_replay_command(cmd: ReplayCommands, config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => ShellConfig::load_from(path)?,
        None => ShellConfig::load()?,
    };
    let script = Script::load(&cmd.script)?;

    let navigator = Navigator::new(&config);
    register_demo_screens(&navigator)?;
    let mut events = navigator.subscribe();

    log::info!("Replaying {} step(s) from {:?}", script.steps.len(), cmd.script);
    for (index, step) in script.steps.into_iter().enumerate() {
        let report = run_step(&navigator, &mut events, index + 1, step).await?;
        if cmd.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print_report(&report, cmd.quiet);
        }
    }

    Ok(())
}

/// Execute one step. Build failures are reported and the script goes on;
/// programmer errors stop it.
pub async fn run_step(
    navigator: &Navigator,
    events: &mut broadcast::Receiver<NavEvent>,
    index: usize,
    step: Step,
) -> Result<StepReport> {
    let result: Result<String, NavError> = match &step {
        Step::Open { screen, params } => navigator
            .navigate_to(screen, params.clone())
            .await
            .map(|_| "ok".to_string()),
        Step::Back => Ok(match navigator.navigate_back().await {
            Some(identity) => format!("left {}", identity),
            None => "already at base".to_string(),
        }),
        Step::Reset { tab } => navigator.reset_to_base(tab.as_deref()).map(|_| "ok".to_string()),
        Step::Tab { tab } => navigator.switch_base_tab(tab).map(|_| "ok".to_string()),
        Step::Wait { ms } => {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
            Ok(format!("waited {}ms", ms))
        }
        Step::Settle => Ok(format!("settled {} transition(s)", navigator.finish_transitions())),
    };

    let (outcome, error) = match result {
        Ok(outcome) => (outcome, None),
        Err(err) if err.is_programmer_error() => {
            return Err(err).with_context(|| format!("Step {} failed", index));
        }
        Err(err) => ("rolled back".to_string(), Some(err.to_string())),
    };

    Ok(StepReport {
        step: index,
        action: step,
        outcome,
        error,
        events: drain_events(events),
        overview: navigator.overview(),
    })
}

fn drain_events(events: &mut broadcast::Receiver<NavEvent>) -> Vec<NavEvent> {
    let mut drained = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => drained.push(event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                log::warn!("Event subscriber lagged, {} event(s) dropped", skipped);
            }
            Err(_) => break,
        }
    }
    drained
}

fn describe(step: &Step) -> String {
    match step {
        Step::Open { screen, params } if params.is_empty() => format!("open {}", screen),
        Step::Open { screen, params } => {
            format!("open {} {}", screen, serde_json::Value::Object(params.as_map().clone()))
        }
        Step::Back => "back".to_string(),
        Step::Reset { tab: Some(tab) } => format!("reset {}", tab),
        Step::Reset { tab: None } => "reset".to_string(),
        Step::Tab { tab } => format!("tab {}", tab),
        Step::Wait { ms } => format!("wait {}ms", ms),
        Step::Settle => "settle".to_string(),
    }
}

fn print_report(report: &StepReport, quiet: bool) {
    let marker = match &report.error {
        None => "✓".bright_green().bold(),
        Some(_) => "✗".bright_red().bold(),
    };
    println!(
        "{} {} {} → {}",
        marker,
        format!("[{}]", report.step).dimmed(),
        describe(&report.action).bright_white().bold(),
        report.outcome
    );
    if let Some(error) = &report.error {
        println!("    {}", error.bright_red());
    }

    for event in &report.events {
        println!("    {} {}", "·".dimmed(), format!("{:?}", event).dimmed());
    }

    if !quiet {
        print_overview(&report.overview);
    }
}

fn print_overview(overview: &NavOverview) {
    let base = format!("base: {} ({:?})", overview.base_tab, overview.base_phase);
    println!("    {} depth {}", base.cyan(), overview.depth);

    for (index, frame) in overview.frames.iter().enumerate() {
        println!("      {} {} {}", index, frame.identity.to_string().bright_white(), frame.title.dimmed());
    }

    for instance in &overview.instances {
        let state = instance.state.to_string();
        let state = match instance.state {
            VisualState::Active => state.bright_green().bold(),
            VisualState::Entering | VisualState::Exiting => state.bright_yellow(),
            VisualState::Dimmed => state.white(),
            VisualState::Hidden => state.dimmed(),
        };
        println!(
            "      {} {:<28} {} rev {}{}",
            if instance.on_stack { "●" } else { "○" },
            instance.identity.to_string(),
            state,
            instance.revision,
            if instance.entity_scoped { " (entity)" } else { "" }
        );
    }

    if overview.pending_transitions > 0 {
        println!("      {}", format!("{} transition(s) pending", overview.pending_transitions).dimmed());
    }
}
