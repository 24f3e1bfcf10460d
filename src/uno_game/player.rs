use super::card::{Card, CardId};
use super::error::GameError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub username: String,
    pub score: u32,
    pub hand: Vec<Card>,
    pub called_uno: bool,
    /// How many of this player's cards are shown to the rest of the table.
    pub visible_card_count: u32,
}

/// A hand as seen by someone else at the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "cards")]
pub enum Hand {
    Visible(Vec<Card>),
    Hidden,
}

impl Hand {
    pub fn is_hidden(&self) -> bool {
        matches!(self, Hand::Hidden)
    }

    pub fn cards(&self) -> Option<&[Card]> {
        match self {
            Hand::Visible(cards) => Some(cards),
            Hand::Hidden => None,
        }
    }
}

/// Redacted projection of a [`Player`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub username: String,
    pub score: u32,
    pub hand: Hand,
    pub card_count: usize,
    pub called_uno: bool,
    pub visible_card_count: u32,
}

impl Player {
    pub fn new(username: impl Into<String>) -> Self {
        Self::with_state(username, 0, Vec::new(), false, 0)
    }

    pub fn with_state(
        username: impl Into<String>,
        score: u32,
        hand: Vec<Card>,
        called_uno: bool,
        visible_card_count: u32,
    ) -> Self {
        Self {
            username: username.into(),
            score,
            hand,
            called_uno,
            visible_card_count,
        }
    }

    /// Adds a card to the player's hand.
    pub fn add_card(&mut self, card: Card) {
        self.hand.push(card);
    }

    pub fn find_card(&self, card_id: CardId) -> Option<&Card> {
        self.hand.iter().find(|c| c.id == card_id)
    }

    /// Removes the card with the given id from the player's hand.
    ///
    /// Lookup is by id only: two cards with the same color and face are
    /// still distinct cards.
    pub fn remove_card(&mut self, card_id: CardId) -> Result<Card, GameError> {
        let index = self
            .hand
            .iter()
            .position(|c| c.id == card_id)
            .ok_or(GameError::CardNotFound(card_id))?;
        Ok(self.hand.remove(index))
    }

    /// Checks if the player has won the round (i.e., their hand is empty).
    pub fn has_won(&self) -> bool {
        self.hand.is_empty()
    }

    pub fn view(&self, show_hand: bool) -> PlayerView {
        PlayerView {
            username: self.username.clone(),
            score: self.score,
            hand: if show_hand {
                Hand::Visible(self.hand.clone())
            } else {
                Hand::Hidden
            },
            card_count: self.hand.len(),
            called_uno: self.called_uno,
            visible_card_count: self.visible_card_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uno_game::card::{CardType, Color};

    #[test]
    fn test_new_player_defaults() {
        let player = Player::new("alice");
        assert_eq!(player.username, "alice");
        assert_eq!(player.score, 0);
        assert!(player.hand.is_empty());
        assert!(!player.called_uno);
        assert_eq!(player.visible_card_count, 0);
        assert!(player.has_won());
    }

    #[test]
    fn test_remove_card_uses_id_not_face() {
        let twin_a = Card::new(10, Color::Red, CardType::Number(4));
        let twin_b = Card::new(11, Color::Red, CardType::Number(4));
        let mut player = Player::with_state("bob", 0, vec![twin_a.clone(), twin_b], false, 0);

        let removed = player.remove_card(11).unwrap();
        assert_eq!(removed.id, 11);
        assert_eq!(player.hand, vec![twin_a]);
    }

    #[test]
    fn test_remove_missing_card() {
        let mut player = Player::new("bob");
        player.add_card(Card::new(1, Color::Blue, CardType::Skip));

        assert_eq!(player.remove_card(2), Err(GameError::CardNotFound(2)));
        assert_eq!(player.hand.len(), 1);
    }

    #[test]
    fn test_view_hides_hand() {
        let mut player = Player::new("carol");
        player.add_card(Card::new(5, Color::Green, CardType::Reverse));

        let hidden = player.view(false);
        assert!(hidden.hand.is_hidden());
        assert_eq!(hidden.card_count, 1);

        let shown = player.view(true);
        assert_eq!(shown.hand.cards().map(|c| c.len()), Some(1));
    }
}
