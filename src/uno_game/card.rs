use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Identity of a card within one deck instance.
pub type CardId = u32;

/// Number of cards in a full catalog.
pub const CATALOG_SIZE: usize = 108;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
    Wild,
}

impl Color {
    /// The four colors a wild card may take once it is played.
    pub const CONCRETE: [Color; 4] = [Color::Red, Color::Yellow, Color::Green, Color::Blue];

    pub fn is_wild(&self) -> bool {
        matches!(self, Color::Wild)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Number(u8),
    Skip,
    Reverse,
    Wild,
    AddTwo,
    WildAddFour,
}

impl CardType {
    pub fn is_wild(&self) -> bool {
        matches!(self, CardType::Wild | CardType::WildAddFour)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub color: Color,
    pub card_type: CardType,
}

impl Card {
    pub fn new(id: CardId, color: Color, card_type: CardType) -> Self {
        Self {
            id,
            color,
            card_type,
        }
    }

    /// Face value, only present for number cards.
    pub fn value(&self) -> Option<u8> {
        match self.card_type {
            CardType::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Copy of this card as it sits on the discard pile with `color` chosen.
    pub fn with_color(&self, color: Color) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }
}

/// Builds the full 108 card catalog in a fixed order.
///
/// Ids are assigned in construction order, so two catalogs always agree on
/// which id names which card.
pub fn build_catalog() -> Vec<Card> {
    let mut deck: Vec<Card> = Vec::with_capacity(CATALOG_SIZE);
    let push = |deck: &mut Vec<Card>, color: Color, card_type: CardType| {
        let id = deck.len() as CardId;
        deck.push(Card::new(id, color, card_type));
    };

    for color in Color::CONCRETE {
        // Two copies of each numbered card (1-9)
        for number in 1..=9 {
            push(&mut deck, color, CardType::Number(number));
            push(&mut deck, color, CardType::Number(number));
        }

        push(&mut deck, color, CardType::Number(0));

        for _ in 0..2 {
            push(&mut deck, color, CardType::Skip);
            push(&mut deck, color, CardType::Reverse);
            push(&mut deck, color, CardType::AddTwo);
        }
    }

    for _ in 0..4 {
        push(&mut deck, Color::Wild, CardType::Wild);
        push(&mut deck, Color::Wild, CardType::WildAddFour);
    }

    deck
}

/// Puts every wild card back to its uncolored in-hand representation.
pub fn reset_wild_colors(cards: &mut [Card]) {
    for card in cards.iter_mut().filter(|c| c.card_type.is_wild()) {
        card.color = Color::Wild;
    }
}

/// Uniform in-place shuffle.
pub fn shuffle<R: Rng + ?Sized>(cards: &mut [Card], rng: &mut R) {
    cards.shuffle(rng);
}
