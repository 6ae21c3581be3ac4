mod cli;
mod client_error;
mod config;

pub use cli::Cli;
pub use client_error::ClientError;
pub use config::{
    DatabaseSettings, OrderSettings, ServerSettings, Settings, UserSettings, get_config_settings,
};
