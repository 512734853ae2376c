//! Core configuration types and loading.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Chat server connection and identity.
    pub irc: IrcConfig,
    /// Optional game feed. Without it the bot only answers commands.
    pub feed: Option<FeedConfig>,
    /// Game data tables.
    pub data: DataConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Score database. Scores are discarded when absent.
    pub database: Option<DatabaseConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Run startup validation, folding every problem into one error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        super::validate(self).map_err(|errors| {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            ConfigError::Invalid(joined)
        })
    }
}

/// Chat server connection and identity.
#[derive(Debug, Clone, Deserialize)]
pub struct IrcConfig {
    /// Server hostname.
    pub server: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub nickname: String,
    /// Defaults to the nickname.
    pub username: Option<String>,
    #[serde(default = "default_realname")]
    pub realname: String,
    /// Channel the feed is relayed to.
    pub channel: String,
}

impl IrcConfig {
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.nickname)
    }

    /// `host:port` for connecting.
    pub fn address(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }
}

/// Game feed source.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// TCP address of the line-oriented feed (e.g. "127.0.0.1:9000").
    pub address: String,
}

/// Game data location.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory holding the JSON tables.
    pub path: PathBuf,
}

/// Command dispatch limits and the celebration reply.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandsConfig {
    #[serde(default = "default_max_alias_hops")]
    pub max_alias_hops: usize,
    /// Nesting limit for handlers that re-enter the dispatcher.
    #[serde(default = "default_max_parse_depth")]
    pub max_parse_depth: usize,
    /// Word that triggers the celebration reply. Empty disables it.
    #[serde(default = "default_celebration_trigger")]
    pub celebration_trigger: String,
    #[serde(default = "default_celebration_reply")]
    pub celebration_reply: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            max_alias_hops: default_max_alias_hops(),
            max_parse_depth: default_max_parse_depth(),
            celebration_trigger: default_celebration_trigger(),
            celebration_reply: default_celebration_reply(),
        }
    }
}

/// Match scoring.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Base award for winning, before the survivor multiplier.
    #[serde(default = "default_victory_points")]
    pub victory_points: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            victory_points: default_victory_points(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file, or `:memory:`.
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r##"
[irc]
server = "irc.example.net"
nickname = "feedbot"
channel = "#tpp"

[data]
path = "data"
"##;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.irc.port, 6667);
        assert_eq!(config.irc.username(), "feedbot");
        assert_eq!(config.irc.realname, "feedbot");
        assert_eq!(config.irc.address(), "irc.example.net:6667");
        assert!(config.feed.is_none());
        assert!(config.database.is_none());
        assert_eq!(config.commands.max_alias_hops, 16);
        assert_eq!(config.commands.max_parse_depth, 8);
        assert_eq!(config.commands.celebration_reply, "Y+A+Y");
        assert_eq!(config.scoring.victory_points, 100.0);
    }

    #[test]
    fn test_partial_commands_section() {
        let toml = format!("{MINIMAL}\n[commands]\nmax_parse_depth = 3\n");
        let config: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.commands.max_parse_depth, 3);
        assert_eq!(config.commands.celebration_trigger, "yay");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{MINIMAL}\n[feed]\naddress = \"127.0.0.1:9000\"\n").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.feed.unwrap().address, "127.0.0.1:9000");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/feedbot.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[irc\nserver = ").unwrap();
        assert!(matches!(
            Config::load(file.path()).unwrap_err(),
            ConfigError::Parse(_)
        ));
    }
}
