//! Environment configuration for the server and the autoplay client

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

use crate::engine::PlanTarget;
use crate::types::GRAVITY_INTERVAL_MS;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub gravity: Duration,
    /// Snapshots buffered per session for slow spectators
    pub spectator_buffer: usize,
    /// Base seed for piece generators; time-derived when unset
    pub seed: Option<u32>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 10340,
            gravity: Duration::from_millis(GRAVITY_INTERVAL_MS),
            spectator_buffer: 64,
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Create from `STACKBOT_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = lookup("STACKBOT_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = parse_var(&lookup, "STACKBOT_PORT").unwrap_or(defaults.port);
        let gravity = parse_var::<u64>(&lookup, "STACKBOT_GRAVITY_MS")
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.gravity);
        let spectator_buffer = parse_var::<usize>(&lookup, "STACKBOT_SPECTATOR_BUFFER")
            .unwrap_or(defaults.spectator_buffer)
            .max(1);
        let seed = parse_var(&lookup, "STACKBOT_SEED");

        Self {
            host,
            port,
            gravity,
            spectator_buffer,
            seed,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

/// Autoplay client configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub addr: String,
    /// Stop after this many games; play forever when unset
    pub games: Option<u32>,
    /// Pause between a game over and the next connection
    pub reconnect_pause: Duration,
    pub humanize: bool,
    pub plan_target: PlanTarget,
    pub seed: Option<u32>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:10340".to_string(),
            games: None,
            reconnect_pause: Duration::from_millis(2000),
            humanize: true,
            plan_target: PlanTarget::Next,
            seed: None,
        }
    }
}

impl BotConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let addr = lookup("STACKBOT_BOT_ADDR")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.addr);
        let games = parse_var(&lookup, "STACKBOT_BOT_GAMES");
        let reconnect_pause = parse_var(&lookup, "STACKBOT_BOT_PAUSE_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.reconnect_pause);
        let humanize = lookup("STACKBOT_BOT_HUMANIZE")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "off" | "no"))
            .unwrap_or(defaults.humanize);
        let plan_target = lookup("STACKBOT_BOT_PLAN")
            .and_then(|v| PlanTarget::from_str(v.trim()))
            .unwrap_or(defaults.plan_target);
        let seed = parse_var(&lookup, "STACKBOT_SEED");

        Self {
            addr,
            games,
            reconnect_pause,
            humanize,
            plan_target,
            seed,
        }
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}
