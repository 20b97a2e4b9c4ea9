use anyhow::Result;
use clap::Args;
use colored::Colorize;

use phone_shell::screens::demo_screens;
use phone_shell::shell::EntityScope;

#[derive(Args)]
pub struct ScreensCommands {
    /// Print as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn handle_screens_command(cmd: ScreensCommands) -> Result<()> {
    let screens = demo_screens();

    if cmd.json {
        let rows: Vec<serde_json::Value> = screens
            .iter()
            .map(|screen| {
                serde_json::json!({
                    "name": screen.name(),
                    "title": screen.display_title(),
                    "key_fields": screen.key_fields(),
                    "content_fields": screen.content_fields(),
                    "refresh": screen.policy(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!();
    println!("  {}", "Demo screens:".bright_white().bold());
    for screen in &screens {
        let scope = match screen.scope() {
            EntityScope::Singleton => "singleton".to_string(),
            EntityScope::PerEntity(fields) => format!("per {}", fields.join("+")),
        };
        println!(
            "  {} {:<16} {:<10} {:<18} refresh: {}",
            "●".bright_green(),
            screen.name().bright_green().bold(),
            screen.display_title(),
            scope.cyan(),
            screen.policy().to_string().bright_yellow()
        );
    }
    println!();

    Ok(())
}
