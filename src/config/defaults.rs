//! Default value functions for configuration.

use crate::commands::registry::DEFAULT_MAX_ALIAS_HOPS;

// =============================================================================
// IRC Defaults
// =============================================================================

pub fn default_port() -> u16 {
    6667
}

pub fn default_realname() -> String {
    "feedbot".to_string()
}

// =============================================================================
// Command Defaults
// =============================================================================

pub fn default_max_alias_hops() -> usize {
    DEFAULT_MAX_ALIAS_HOPS
}

pub fn default_max_parse_depth() -> usize {
    8
}

pub fn default_celebration_trigger() -> String {
    "yay".to_string()
}

pub fn default_celebration_reply() -> String {
    "Y+A+Y".to_string()
}

// =============================================================================
// Scoring Defaults
// =============================================================================

pub fn default_victory_points() -> f64 {
    100.0
}
