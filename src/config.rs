//! Server configuration.
//!
//! Values come from command line flags, falling back to `UNO_*` environment
//! variables and then to defaults.

use clap::Parser;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Clone, Parser)]
#[command(name = "uno-rooms", about = "Multi-room Uno game server")]
pub struct Cli {
    /// Address the HTTP server listens on
    #[arg(long, env = "UNO_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Seats in a room when the creator doesn't ask for a number
    #[arg(long, env = "UNO_DEFAULT_MAX_PLAYERS", default_value_t = 4)]
    pub default_max_players: usize,

    /// Largest room a client may create
    #[arg(long, env = "UNO_MAX_PLAYERS_LIMIT", default_value_t = 10)]
    pub max_players_limit: usize,

    /// Minutes without activity before a room is evicted
    #[arg(long, env = "UNO_IDLE_MINUTES", default_value_t = 60)]
    pub idle_minutes: i64,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long, env = "UNO_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Rooms need at least 2 seats, got {0}")]
    TooFewSeats(usize),

    #[error("Default room size {default} exceeds the limit of {limit}")]
    DefaultAboveLimit { default: usize, limit: usize },

    #[error("Idle timeout must be positive, got {0} minutes")]
    InvalidIdleTimeout(i64),
}

/// Validated server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub default_max_players: usize,
    pub max_players_limit: usize,
    pub idle_timeout: chrono::Duration,
    pub log_level: String,
}

impl ServerConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        if cli.max_players_limit < 2 {
            return Err(ConfigError::TooFewSeats(cli.max_players_limit));
        }
        if cli.default_max_players < 2 {
            return Err(ConfigError::TooFewSeats(cli.default_max_players));
        }
        if cli.default_max_players > cli.max_players_limit {
            return Err(ConfigError::DefaultAboveLimit {
                default: cli.default_max_players,
                limit: cli.max_players_limit,
            });
        }
        if cli.idle_minutes <= 0 {
            return Err(ConfigError::InvalidIdleTimeout(cli.idle_minutes));
        }

        Ok(Self {
            bind: cli.bind,
            default_max_players: cli.default_max_players,
            max_players_limit: cli.max_players_limit,
            idle_timeout: chrono::Duration::minutes(cli.idle_minutes),
            log_level: cli.log_level,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            default_max_players: 4,
            max_players_limit: 10,
            idle_timeout: chrono::Duration::minutes(60),
            log_level: "info".to_string(),
        }
    }
}
