//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use crate::commands::is_channel;
use std::path::Path;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("irc.server is required")]
    MissingServer,
    #[error("irc.nickname is required")]
    MissingNickname,
    #[error("irc.channel must start with '#' or '&', got '{0}'")]
    InvalidChannel(String),
    #[error("commands.{0} must be greater than zero")]
    ZeroLimit(&'static str),
    #[error("database.path parent directory does not exist: {0}")]
    DatabasePathInvalid(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.irc.server.is_empty() {
        errors.push(ValidationError::MissingServer);
    }
    if config.irc.nickname.is_empty() {
        errors.push(ValidationError::MissingNickname);
    }
    if !is_channel(&config.irc.channel) {
        errors.push(ValidationError::InvalidChannel(config.irc.channel.clone()));
    }

    if config.commands.max_alias_hops == 0 {
        errors.push(ValidationError::ZeroLimit("max_alias_hops"));
    }
    if config.commands.max_parse_depth == 0 {
        errors.push(ValidationError::ZeroLimit("max_parse_depth"));
    }

    if let Some(ref db) = config.database
        && db.path != ":memory:"
    {
        let db_path = Path::new(&db.path);
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            errors.push(ValidationError::DatabasePathInvalid(db.path.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
