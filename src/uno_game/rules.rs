//! Turn order, card legality and scoring.

use super::card::{Card, CardType};
use serde::{Deserialize, Serialize};

/// Represents the direction of play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub fn reverse(&self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// Seat offset of one step: +1 or -1.
    pub fn step(&self) -> isize {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

/// Tunable penalties and deal size for a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub hand_size: usize,
    pub add_two_penalty: usize,
    pub wild_add_four_penalty: usize,
    /// Cards drawn by a player caught holding one card without calling uno.
    pub uno_penalty: usize,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            hand_size: 7,
            add_two_penalty: 4,
            wild_add_four_penalty: 4,
            uno_penalty: 4,
        }
    }
}

/// Seat index of the player after `current`.
///
/// A `Reverse` flips the direction before stepping, a `Skip` steps twice.
/// With two seats a `Reverse` hands the turn back to whoever played it, so it
/// behaves like a `Skip`. The caller is responsible for persisting the flipped
/// direction.
pub fn next_player(
    current: usize,
    player_count: usize,
    direction: Direction,
    card_played: CardType,
) -> usize {
    if player_count == 0 {
        return 0;
    }

    let direction = if card_played == CardType::Reverse {
        direction.reverse()
    } else {
        direction
    };

    let mut movement = direction.step();
    if card_played == CardType::Skip || (card_played == CardType::Reverse && player_count == 2) {
        movement *= 2;
    }

    (current as isize + movement).rem_euclid(player_count as isize) as usize
}

/// Checks if `card` can be placed on `top_card`.
pub fn is_playable(card: &Card, top_card: &Card) -> bool {
    if card.color == top_card.color || card.color.is_wild() || top_card.color.is_wild() {
        return true;
    }

    match (card.card_type, top_card.card_type) {
        (CardType::Number(n), CardType::Number(m)) => n == m,
        _ => false,
    }
}

/// Points held in a hand at the end of a round.
pub fn score(hand: &[Card]) -> u32 {
    hand.iter()
        .map(|card| match card.card_type {
            CardType::Number(n) => u32::from(n),
            CardType::Skip | CardType::Reverse | CardType::AddTwo => 20,
            CardType::Wild | CardType::WildAddFour => 50,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uno_game::card::{build_catalog, Color};

    #[test]
    fn test_next_player_number() {
        assert_eq!(next_player(0, 3, Direction::Clockwise, CardType::Number(3)), 1);
        assert_eq!(next_player(2, 3, Direction::Clockwise, CardType::Number(3)), 0);
        assert_eq!(
            next_player(0, 3, Direction::CounterClockwise, CardType::Number(3)),
            2
        );
    }

    #[test]
    fn test_next_player_skip() {
        assert_eq!(next_player(0, 3, Direction::Clockwise, CardType::Skip), 2);
        assert_eq!(next_player(1, 4, Direction::CounterClockwise, CardType::Skip), 3);
        assert_eq!(next_player(0, 2, Direction::Clockwise, CardType::Skip), 0);
    }

    #[test]
    fn test_next_player_reverse() {
        assert_eq!(next_player(1, 3, Direction::Clockwise, CardType::Reverse), 0);
        assert_eq!(
            next_player(1, 3, Direction::CounterClockwise, CardType::Reverse),
            2
        );
    }

    #[test]
    fn test_two_seats_reverse_matches_skip() {
        for current in 0..2 {
            for direction in [Direction::Clockwise, Direction::CounterClockwise] {
                assert_eq!(
                    next_player(current, 2, direction, CardType::Reverse),
                    next_player(current, 2, direction, CardType::Skip)
                );
            }
        }
    }

    #[test]
    fn test_next_player_in_range() {
        let kinds = [
            CardType::Number(1),
            CardType::Skip,
            CardType::Reverse,
            CardType::AddTwo,
            CardType::Wild,
            CardType::WildAddFour,
        ];
        for count in 1..=6 {
            for current in 0..count {
                for kind in kinds {
                    for direction in [Direction::Clockwise, Direction::CounterClockwise] {
                        assert!(next_player(current, count, direction, kind) < count);
                    }
                }
            }
        }
    }

    #[test]
    fn test_is_playable() {
        let red_one = Card::new(0, Color::Red, CardType::Number(1));
        let blue_one = Card::new(1, Color::Blue, CardType::Number(1));
        let blue_two = Card::new(2, Color::Blue, CardType::Number(2));
        let red_skip = Card::new(3, Color::Red, CardType::Skip);
        let blue_skip = Card::new(4, Color::Blue, CardType::Skip);
        let wild = Card::new(5, Color::Wild, CardType::Wild);
        let played_wild = Card::new(6, Color::Green, CardType::Wild);

        assert!(is_playable(&red_one, &blue_one));
        assert!(!is_playable(&red_one, &blue_two));
        assert!(is_playable(&red_skip, &red_one));
        // Action cards only match on color
        assert!(!is_playable(&red_skip, &blue_skip));
        assert!(is_playable(&wild, &blue_two));
        assert!(is_playable(&blue_two, &wild));
        // A colored wild on the discard pile only takes its chosen color
        assert!(!is_playable(&blue_two, &played_wild));
    }

    #[test]
    fn test_is_playable_reflexive() {
        for card in build_catalog() {
            assert!(is_playable(&card, &card));
        }
    }

    #[test]
    fn test_score() {
        let hand = vec![
            Card::new(0, Color::Red, CardType::Number(5)),
            Card::new(1, Color::Red, CardType::Number(0)),
            Card::new(2, Color::Blue, CardType::Skip),
            Card::new(3, Color::Blue, CardType::Reverse),
            Card::new(4, Color::Yellow, CardType::AddTwo),
            Card::new(5, Color::Wild, CardType::Wild),
            Card::new(6, Color::Wild, CardType::WildAddFour),
        ];
        assert_eq!(score(&hand), 5 + 60 + 100);
        assert_eq!(score(&[]), 0);
    }

    #[test]
    fn test_default_rules() {
        let rules = GameRules::default();
        assert_eq!(rules.hand_size, 7);
        assert_eq!(rules.add_two_penalty, 4);
        assert_eq!(rules.wild_add_four_penalty, 4);
        assert_eq!(rules.uno_penalty, 4);
    }
}
