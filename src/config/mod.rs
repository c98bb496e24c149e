pub mod toml_config;

pub use toml_config::AppConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "convert-pro")]
#[command(about = "File conversion service with free and premium tiers")]
pub struct ServerArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the listening port from config
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Emit JSON logs
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ServerArgs {
    /// Loads the config file if given, then applies command-line overrides.
    pub fn load_config(&self) -> crate::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(port) = self.port {
            config.server.port = port;
        }

        Ok(config)
    }
}
