pub mod api;
pub mod card;
pub mod error;
pub mod game;
pub mod player;
pub mod registry;
pub mod rules;

pub use card::{build_catalog, Card, CardId, CardType, Color};
pub use error::{ErrorCategory, GameError};
pub use game::{Game, GameView};
pub use player::{Hand, Player, PlayerView};
pub use registry::{Room, RoomRegistry};
pub use rules::{is_playable, next_player, score, Direction, GameRules};
