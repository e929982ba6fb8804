//! Room configuration models.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use rand::{Rng, distr::Alphanumeric};
use serde::{Deserialize, Serialize};

use super::{PlayerId, RoomError, RoomId, holdem::HOLDEM_MAX_SEATS};
use crate::game::entities::Chips;

/// Prefix for public room ids. Private rooms use the first letters of the
/// room name instead.
pub const PUBLIC_ROOM_PREFIX: &str = "PUB";

/// Length of the random part of a room id
pub const ROOM_CODE_LEN: usize = 6;

/// Maximum room name length in characters
pub const MAX_ROOM_NAME_LEN: usize = 40;

/// How long an empty room may linger before the idle sweep evicts it
pub const ROOM_RETENTION_HOURS: i64 = 4;

/// Room creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomOptions<S> {
    /// Display name
    pub room_name: String,

    /// Optional join password (stored hashed)
    #[serde(default)]
    pub password: Option<String>,

    /// Seat capacity
    pub max_players: usize,

    /// Whether the room shows up in public listings
    pub is_public: bool,

    /// Variant specific settings (stakes for Hold'em)
    #[serde(default)]
    pub settings: S,
}

impl<S: Default> Default for RoomOptions<S> {
    fn default() -> Self {
        Self {
            room_name: "Party Room".to_string(),
            password: None,
            max_players: 6,
            is_public: true,
            settings: S::default(),
        }
    }
}

impl<S> RoomOptions<S> {
    /// Validate the variant independent parts of the request
    pub fn validate(&self, max_seats: usize) -> Result<(), RoomError> {
        let name = self.room_name.trim();
        if name.is_empty() {
            return Err(RoomError::InvalidConfig("Room name is required".to_string()));
        }

        if name.chars().count() > MAX_ROOM_NAME_LEN {
            return Err(RoomError::InvalidConfig(format!(
                "Room name must be at most {MAX_ROOM_NAME_LEN} characters"
            )));
        }

        if self.max_players < 2 || self.max_players > max_seats {
            return Err(RoomError::InvalidConfig(format!(
                "Max players must be between 2 and {max_seats}"
            )));
        }

        Ok(())
    }

    /// The password to protect the room with, if a non-blank one was given
    pub fn effective_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

/// Immutable room configuration, fixed at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomConfig {
    /// Room ID
    pub id: RoomId,

    /// Room name
    pub name: String,

    /// Argon2id-hashed password (if protected)
    #[serde(skip)]
    pub password_hash: Option<String>,

    /// Maximum number of players
    pub max_players: usize,

    /// Whether the room is listed publicly
    pub is_public: bool,

    /// Player who asked for the room
    pub creator_id: PlayerId,

    /// Creation timestamp, used by the idle sweep
    pub created_at: DateTime<Utc>,
}

impl RoomConfig {
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Check a join attempt against the stored hash. Rooms without a
    /// password accept anything.
    pub fn verify_password(&self, attempt: Option<&str>) -> Result<(), RoomError> {
        let Some(ref required_hash) = self.password_hash else {
            return Ok(());
        };

        let Some(attempt) = attempt else {
            return Err(RoomError::InvalidPassword);
        };

        let parsed_hash = match PasswordHash::new(required_hash) {
            Ok(h) => h,
            Err(_) => {
                log::error!("Invalid password hash format for room {}", self.id);
                return Err(RoomError::JoinFailed);
            }
        };

        Argon2::default()
            .verify_password(attempt.as_bytes(), &parsed_hash)
            .map_err(|_| RoomError::InvalidPassword)
    }
}

/// Hash a room password with Argon2id
pub fn hash_password(password: &str) -> Result<String, RoomError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| RoomError::InvalidConfig("Password could not be hashed".to_string()))
}

/// Generate a short room code such as `PUB-7K3QZP` or, for a private room
/// named "Friday night", `FRI-Q2M8XA`.
pub fn generate_room_id(room_name: &str, is_public: bool) -> RoomId {
    let prefix = if is_public {
        PUBLIC_ROOM_PREFIX.to_string()
    } else {
        let letters: String = room_name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .take(3)
            .collect::<String>()
            .to_ascii_uppercase();
        if letters.is_empty() {
            "RM".to_string()
        } else {
            letters
        }
    };

    let code: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ROOM_CODE_LEN)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();

    format!("{prefix}-{code}")
}

/// Hold'em table stakes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStakes {
    /// Chips every player sits down with
    pub buy_in: Chips,

    /// Small blind amount
    pub small_blind: Chips,

    /// Big blind amount
    pub big_blind: Chips,
}

impl Default for TableStakes {
    fn default() -> Self {
        Self {
            buy_in: 1000,
            small_blind: 10,
            big_blind: 20,
        }
    }
}

impl TableStakes {
    /// Validate stakes
    pub fn validate(&self) -> Result<(), RoomError> {
        if self.small_blind == 0 {
            return Err(RoomError::InvalidConfig(
                "Small blind must be positive".to_string(),
            ));
        }

        if self.big_blind <= self.small_blind {
            return Err(RoomError::InvalidConfig(
                "Big blind must be greater than small blind".to_string(),
            ));
        }

        if self.buy_in < self.big_blind {
            return Err(RoomError::InvalidConfig(
                "Buy-in must cover at least one big blind".to_string(),
            ));
        }

        // Every chip on a full table has to fit in one pot.
        if u64::from(self.buy_in) * HOLDEM_MAX_SEATS as u64 > u64::from(Chips::MAX) {
            return Err(RoomError::InvalidConfig(format!(
                "Buy-in must be at most {}",
                Self::max_buy_in()
            )));
        }

        Ok(())
    }

    /// Largest buy-in a full table can hold without overflowing the pot
    pub fn max_buy_in() -> Chips {
        Chips::MAX / HOLDEM_MAX_SEATS as Chips
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_room_id_prefix() {
        let id = generate_room_id("Anything", true);
        assert!(id.starts_with("PUB-"));
        assert_eq!(id.len(), 4 + ROOM_CODE_LEN);
        assert!(id[4..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_private_room_id_uses_name() {
        assert!(generate_room_id("friday night", false).starts_with("FRI-"));
        assert!(generate_room_id("a b", false).starts_with("AB-"));
        assert!(generate_room_id("!!!", false).starts_with("RM-"));
    }

    #[test]
    fn test_room_ids_differ() {
        let a = generate_room_id("x", true);
        let b = generate_room_id("x", true);
        assert_ne!(a, b);
    }

    #[test]
    fn test_options_validation() {
        let mut options: RoomOptions<()> = RoomOptions::default();
        assert!(options.validate(10).is_ok());

        options.max_players = 1;
        assert!(options.validate(10).is_err());

        options.max_players = 11;
        assert!(options.validate(10).is_err());

        options.max_players = 4;
        options.room_name = "   ".to_string();
        assert!(options.validate(10).is_err());
    }

    #[test]
    fn test_blank_password_is_ignored() {
        let options: RoomOptions<()> = RoomOptions {
            password: Some(String::new()),
            ..RoomOptions::default()
        };
        assert_eq!(options.effective_password(), None);
    }

    #[test]
    fn test_stakes_validation() {
        assert!(TableStakes::default().validate().is_ok());

        let inverted = TableStakes {
            small_blind: 20,
            big_blind: 10,
            ..TableStakes::default()
        };
        assert!(inverted.validate().is_err());

        let short = TableStakes {
            buy_in: 10,
            ..TableStakes::default()
        };
        assert!(short.validate().is_err());

        let largest = TableStakes {
            buy_in: TableStakes::max_buy_in(),
            ..TableStakes::default()
        };
        assert!(largest.validate().is_ok());

        let huge = TableStakes {
            buy_in: 3_000_000_000,
            small_blind: 1,
            big_blind: 2,
        };
        assert!(matches!(huge.validate(), Err(RoomError::InvalidConfig(_))));
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("hunter2").expect("hash");
        let config = RoomConfig {
            id: "PUB-TEST01".to_string(),
            name: "Test".to_string(),
            password_hash: Some(hash),
            max_players: 4,
            is_public: true,
            creator_id: "creator".to_string(),
            created_at: Utc::now(),
        };

        assert!(config.verify_password(Some("hunter2")).is_ok());
        assert_eq!(
            config.verify_password(Some("nope")),
            Err(RoomError::InvalidPassword)
        );
        assert_eq!(config.verify_password(None), Err(RoomError::InvalidPassword));
    }
}
