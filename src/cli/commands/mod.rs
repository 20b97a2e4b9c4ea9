pub mod config;
pub mod replay;
pub mod screens;

pub use config::{ConfigCommands, handle_config_command};
pub use replay::{ReplayCommands, handle_replay_command};
pub use screens::{ScreensCommands, handle_screens_command};
