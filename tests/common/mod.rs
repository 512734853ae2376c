//! Integration test common infrastructure.
//!
//! Provides the fixture game data, a bot wired over it, and a score store
//! that records commits.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use slirc_feedbot::Bridge;
use slirc_feedbot::config::Config;
use slirc_feedbot::dex::MemoryDex;
use slirc_feedbot::error::StoreError;
use slirc_feedbot::scoring::ScoreStore;
use std::path::PathBuf;
use std::sync::Arc;

pub const CHANNEL: &str = "#tpp";
pub const NICK: &str = "feedbot";

/// Directory with the fixture JSON tables.
pub fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/dex")
}

pub fn fixture_dex() -> MemoryDex {
    MemoryDex::load_dir(fixture_dir()).expect("fixture data should load")
}

pub fn test_config() -> Config {
    let toml = format!(
        r#"
[irc]
server = "127.0.0.1"
nickname = "{NICK}"
channel = "{CHANNEL}"

[data]
path = "{}"
"#,
        fixture_dir().display()
    );
    toml::from_str(&toml).expect("test config should parse")
}

pub fn test_bridge() -> Bridge {
    Bridge::from_config(&test_config(), Arc::new(fixture_dex()))
}

/// Chat texts `bridge` sends in reply to `text` from alice in the channel.
pub fn say(bridge: &Bridge, text: &str) -> Vec<String> {
    let line = slirc_feedbot::commands::ChatLine::new("alice", CHANNEL, text);
    bridge.on_message(&line).into_iter().map(|l| l.text).collect()
}

/// Score store that remembers every commit in order.
#[derive(Default)]
pub struct RecordingStore {
    commits: Mutex<Vec<(String, i64)>>,
    fail: bool,
}

impl RecordingStore {
    /// A store whose commits all fail after being recorded.
    pub fn failing() -> Self {
        Self {
            commits: Mutex::default(),
            fail: true,
        }
    }

    pub fn commits(&self) -> Vec<(String, i64)> {
        self.commits.lock().clone()
    }
}

#[async_trait]
impl ScoreStore for RecordingStore {
    async fn commit_score(&self, name: &str, points: i64) -> Result<(), StoreError> {
        self.commits.lock().push((name.to_string(), points));
        if self.fail {
            return Err(StoreError::Sqlx(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}
