pub mod config;
pub mod screens;
pub mod shell;
