//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use party_poker::{BsRoom, GameRoom, HoldemRoom, TableStakes};
use std::net::{Ipv4Addr, SocketAddr};

/// Port used when neither `--bind` nor `SERVER_BIND` is given
const DEFAULT_PORT: u16 = 6969;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Seconds between idle room sweeps
    pub sweep_interval_secs: u64,
    /// Defaults applied to room creation requests that leave fields out
    pub room_defaults: RoomDefaultsConfig,
}

/// Room creation defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomDefaultsConfig {
    /// Seat capacity when the request has none
    pub max_players: usize,
    /// Hold'em stakes when the request has none
    pub stakes: TableStakes,
}

impl Default for RoomDefaultsConfig {
    fn default() -> Self {
        Self {
            max_players: 6,
            stakes: TableStakes::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `sweep_override` - Optional sweep interval override (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<ServerConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if `SERVER_BIND` is set but is not a socket address
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        sweep_override: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => match std::env::var("SERVER_BIND") {
                Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                    var: "SERVER_BIND".to_string(),
                    reason: format!("'{raw}' is not an IP:PORT address"),
                })?,
                Err(_) => SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            },
        };

        let sweep_interval_secs =
            sweep_override.unwrap_or_else(|| parse_env_or("ROOM_SWEEP_INTERVAL_SECS", 300));

        let fallback = RoomDefaultsConfig::default();
        let room_defaults = RoomDefaultsConfig {
            max_players: parse_env_or("DEFAULT_MAX_PLAYERS", fallback.max_players),
            stakes: TableStakes {
                buy_in: parse_env_or("HOLDEM_DEFAULT_BUY_IN", fallback.stakes.buy_in),
                small_blind: parse_env_or("HOLDEM_DEFAULT_SMALL_BLIND", fallback.stakes.small_blind),
                big_blind: parse_env_or("HOLDEM_DEFAULT_BIG_BLIND", fallback.stakes.big_blind),
            },
        };

        Ok(ServerConfig {
            bind,
            sweep_interval_secs,
            room_defaults,
        })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "ROOM_SWEEP_INTERVAL_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        let seat_limit = HoldemRoom::MAX_SEATS.min(BsRoom::MAX_SEATS);
        if !(2..=seat_limit).contains(&self.room_defaults.max_players) {
            return Err(ConfigError::Invalid {
                var: "DEFAULT_MAX_PLAYERS".to_string(),
                reason: format!("Must be between 2 and {seat_limit}"),
            });
        }

        self.room_defaults
            .stakes
            .validate()
            .map_err(|e| ConfigError::Invalid {
                var: "HOLDEM_DEFAULT_*".to_string(),
                reason: e.to_string(),
            })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:8080".parse().unwrap(),
            sweep_interval_secs: 60,
            room_defaults: RoomDefaultsConfig::default(),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        config().validate().unwrap();
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid {
            var: "SERVER_BIND".to_string(),
            reason: "'nowhere' is not an IP:PORT address".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("SERVER_BIND"));
        assert!(msg.contains("nowhere"));
    }

    #[test]
    fn test_overrides_win() {
        let bind: SocketAddr = "0.0.0.0:9000".parse().unwrap();
        let config = ServerConfig::from_env(Some(bind), Some(5)).unwrap();
        assert_eq!(config.bind, bind);
        assert_eq!(config.sweep_interval_secs, 5);
    }

    #[test]
    fn test_zero_sweep_interval_rejected() {
        let mut config = config();
        config.sweep_interval_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { var, .. }) if var == "ROOM_SWEEP_INTERVAL_SECS"
        ));
    }

    #[test]
    fn test_seat_limit_enforced() {
        let mut config = config();
        config.room_defaults.max_players = 1;
        assert!(config.validate().is_err());

        config.room_defaults.max_players = 11;
        assert!(config.validate().is_err());

        config.room_defaults.max_players = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_big_blind_too_small() {
        let mut config = config();
        config.room_defaults.stakes = TableStakes {
            buy_in: 1000,
            small_blind: 20,
            big_blind: 10,
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("HOLDEM_DEFAULT_*"));
    }
}
