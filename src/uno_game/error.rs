//! Game error types.

use thiserror::Error;

use super::card::CardId;

/// Broad class of a [`GameError`], used by callers to pick a client outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request breaks a rule; the game is untouched.
    Validation,
    /// The game value itself is not in a usable shape.
    State,
}

/// Errors raised by game operations. None of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Too many initial players: {requested} for {max_players} seats")]
    TooManyPlayers { requested: usize, max_players: usize },

    #[error("Game is full")]
    GameFull,

    #[error("Player {0} is already in the game")]
    DuplicateUsername(String),

    #[error("A color must be chosen when playing a wild card")]
    WildColorRequired,

    #[error("Card isn't playable on the top of the discard pile")]
    CardNotPlayable,

    #[error("Card {0} not found in player's hand")]
    CardNotFound(CardId),

    #[error("No player at seat {0}")]
    InvalidPlayerIndex(usize),

    /// Uno can only be called with one or two cards left.
    #[error("Cannot call uno holding {0} cards")]
    UnoNotAllowed(usize),

    #[error("Game has no draw pile")]
    NoDrawPile,

    #[error("Player at seat {0} has no hand")]
    CorruptPlayerState(usize),
}

impl GameError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GameError::NoDrawPile | GameError::CorruptPlayerState(_) => ErrorCategory::State,
            _ => ErrorCategory::Validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(GameError::GameFull.category(), ErrorCategory::Validation);
        assert_eq!(
            GameError::CardNotFound(3).category(),
            ErrorCategory::Validation
        );
        assert_eq!(GameError::NoDrawPile.category(), ErrorCategory::State);
        assert_eq!(
            GameError::CorruptPlayerState(1).category(),
            ErrorCategory::State
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            GameError::DuplicateUsername("alice".into()).to_string(),
            "Player alice is already in the game"
        );
        assert_eq!(
            GameError::TooManyPlayers {
                requested: 5,
                max_players: 4
            }
            .to_string(),
            "Too many initial players: 5 for 4 seats"
        );
    }
}
