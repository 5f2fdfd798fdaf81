//! Sync configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SEND_INTERVAL_MS: u64 = 200;
pub const DEFAULT_RECEIVE_INTERVAL_MS: u64 = 200;
pub const DEFAULT_ANIMATION_MS: u64 = 350;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Minimum spacing between outgoing view publishes.
    pub send_interval: Duration,
    /// Minimum spacing between applications of incoming views.
    pub receive_interval: Duration,
    /// How long the viewport animates towards a received view.
    pub animation_duration: Duration,
    /// Frame the whole model once it has loaded.
    pub normalize_on_load: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            send_interval: Duration::from_millis(DEFAULT_SEND_INTERVAL_MS),
            receive_interval: Duration::from_millis(DEFAULT_RECEIVE_INTERVAL_MS),
            animation_duration: Duration::from_millis(DEFAULT_ANIMATION_MS),
            normalize_on_load: true,
        }
    }
}

impl SyncConfig {
    /// Build config from environment variables. Absent or unparsable values
    /// fall back to the defaults.
    ///
    /// - `VIEWSYNC_SEND_INTERVAL_MS`: default 200
    /// - `VIEWSYNC_RECEIVE_INTERVAL_MS`: default 200
    /// - `VIEWSYNC_ANIMATION_MS`: default 350
    /// - `VIEWSYNC_NORMALIZE_ON_LOAD`: `true` (default) or `false`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let ms = |key: &str, default: u64| Duration::from_millis(parse_or(lookup(key), default));
        Self {
            send_interval: ms("VIEWSYNC_SEND_INTERVAL_MS", DEFAULT_SEND_INTERVAL_MS),
            receive_interval: ms("VIEWSYNC_RECEIVE_INTERVAL_MS", DEFAULT_RECEIVE_INTERVAL_MS),
            animation_duration: ms("VIEWSYNC_ANIMATION_MS", DEFAULT_ANIMATION_MS),
            normalize_on_load: parse_or(lookup("VIEWSYNC_NORMALIZE_ON_LOAD"), true),
        }
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    match raw.map(|v| v.trim().parse::<T>()) {
        Some(Ok(value)) => value,
        _ => default,
    }
}
