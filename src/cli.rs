//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, ConfigError};

#[derive(Debug, Parser)]
#[command(name = "issuedesk")]
#[command(about = "Terminal client for browsing, creating and editing issues")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Base URL of the issue service
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Issues per page
    #[arg(long, global = true, value_name = "N")]
    pub page_size: Option<u32>,

    /// Path to config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Initial route, e.g. /issues or /issues/42
    #[arg(value_name = "ROUTE")]
    pub route: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the issue service is reachable
    Health,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.server.url = url.clone();
        }
        if let Some(page_size) = self.page_size {
            config.settings.page_size = page_size;
        }
    }

    /// Load the configuration file and apply overrides.
    ///
    /// `--config` wins over `$ISSUEDESK_CONFIG` and the default location.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["issuedesk"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.route.is_none());
        assert!(cli.api_url.is_none());
    }

    #[test]
    fn test_parse_route_and_flags() {
        let cli = Cli::try_parse_from([
            "issuedesk",
            "--api-url",
            "http://localhost:9000",
            "--page-size",
            "25",
            "/issues/7",
        ])
        .unwrap();
        assert_eq!(cli.route.as_deref(), Some("/issues/7"));
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(cli.page_size, Some(25));
    }

    #[test]
    fn test_parse_health() {
        let cli = Cli::try_parse_from(["issuedesk", "health"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Health)));
    }

    #[test]
    fn test_invalid_page_size_rejected() {
        assert!(Cli::try_parse_from(["issuedesk", "--page-size", "many"]).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let cli = Cli::try_parse_from(["issuedesk", "--api-url", "http://10.0.0.5:8000"]).unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.server.url, "http://10.0.0.5:8000");
        assert_eq!(config.settings.page_size, 10);
    }

    #[test]
    fn test_load_config_from_flag() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[settings]\npage_size = 50").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let cli = Cli::try_parse_from(["issuedesk", "--config", &path, "--page-size", "5"]).unwrap();
        let config = cli.load_config().unwrap();
        assert_eq!(config.settings.page_size, 5);
        assert_eq!(config.server.url, "http://localhost:8000");
    }

    #[test]
    fn test_load_config_rejects_zero_page_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let path = path.to_string_lossy().to_string();

        let cli = Cli::try_parse_from(["issuedesk", "--config", &path, "--page-size", "0"]).unwrap();
        assert!(matches!(
            cli.load_config(),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
