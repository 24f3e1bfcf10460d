use super::card::{build_catalog, reset_wild_colors, shuffle, Card, CardId, CardType, Color};
use super::error::GameError;
use super::player::{Player, PlayerView};
use super::rules::{is_playable, next_player, score, Direction, GameRules};
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Authoritative state of one room. Only this shape can be mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GameRecord")]
pub struct Game {
    pub id: String,
    pub name: String,
    pub max_players: usize,
    pub players: Vec<Player>,
    pub draw_pile: Vec<Card>,
    /// Top of the pile is the last element.
    pub discard_pile: Vec<Card>,
    pub direction: Direction,
    pub current_player: usize,
    pub rules: GameRules,
}

/// What one viewer is allowed to see of a [`Game`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameView {
    pub id: String,
    pub name: String,
    pub max_players: usize,
    pub players: Vec<PlayerView>,
    pub draw_pile_remaining: usize,
    pub discard_pile: Vec<Card>,
    pub direction: Direction,
    pub current_player: usize,
}

impl Game {
    pub fn new<I, S>(
        name: impl Into<String>,
        max_players: usize,
        usernames: I,
    ) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new_with_rng(name, max_players, usernames, &mut rand::rng())
    }

    pub fn new_with_rng<I, S, R>(
        name: impl Into<String>,
        max_players: usize,
        usernames: I,
        rng: &mut R,
    ) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        R: Rng + ?Sized,
    {
        Self::with_rules(name, max_players, usernames, GameRules::default(), rng)
    }

    /// Creates a room, seats `usernames` in order and deals their hands.
    pub fn with_rules<I, S, R>(
        name: impl Into<String>,
        max_players: usize,
        usernames: I,
        rules: GameRules,
        rng: &mut R,
    ) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        R: Rng + ?Sized,
    {
        let usernames: Vec<String> = usernames.into_iter().map(Into::into).collect();
        if usernames.len() > max_players {
            return Err(GameError::TooManyPlayers {
                requested: usernames.len(),
                max_players,
            });
        }

        let mut players: Vec<Player> = Vec::with_capacity(usernames.len());
        for username in usernames {
            if players.iter().any(|p| p.username == username) {
                return Err(GameError::DuplicateUsername(username));
            }
            players.push(Player::new(username));
        }

        let mut game = Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            max_players,
            players,
            draw_pile: Vec::new(),
            discard_pile: Vec::new(),
            direction: Direction::Clockwise,
            current_player: 0,
            rules,
        };
        game.reset_piles(rng);
        game.deal();

        info!(
            "Created game {} ({}) with {} of {} seats taken",
            game.id,
            game.name,
            game.players.len(),
            game.max_players
        );
        Ok(game)
    }

    /// Replaces both piles with a freshly shuffled catalog, turns one card
    /// face up and resets turn order.
    fn reset_piles<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut draw_pile = build_catalog();
        shuffle(&mut draw_pile, rng);

        self.discard_pile = draw_pile.pop().into_iter().collect();
        self.draw_pile = draw_pile;
        self.direction = Direction::Clockwise;
        self.current_player = 0;
    }

    /// Deals `hand_size` rounds from the draw pile, one card per seat per
    /// round. Stops quietly when the draw pile runs out.
    pub fn deal(&mut self) {
        for _ in 0..self.rules.hand_size {
            for player in self.players.iter_mut() {
                match self.draw_pile.pop() {
                    Some(card) => player.add_card(card),
                    None => {
                        debug!("Draw pile exhausted while dealing in game {}", self.id);
                        return;
                    }
                }
            }
        }
    }

    fn check_seat(&self, player_index: usize) -> Result<(), GameError> {
        if player_index < self.players.len() {
            Ok(())
        } else {
            Err(GameError::InvalidPlayerIndex(player_index))
        }
    }

    pub fn seat_of(&self, username: &str) -> Option<usize> {
        self.players.iter().position(|p| p.username == username)
    }

    pub fn top_card(&self) -> Option<&Card> {
        self.discard_pile.last()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players
    }

    /// Seats a new player and draws their opening hand.
    pub fn add_player(&mut self, username: impl Into<String>) -> Result<usize, GameError> {
        let username = username.into();
        if self.is_full() {
            return Err(GameError::GameFull);
        }
        if self.seat_of(&username).is_some() {
            return Err(GameError::DuplicateUsername(username));
        }

        self.players.push(Player::new(username));
        let seat = self.players.len() - 1;
        for _ in 0..self.rules.hand_size {
            self.draw_card(seat)?;
        }

        info!(
            "Player {} joined game {} at seat {}",
            self.players[seat].username, self.id, seat
        );
        Ok(seat)
    }

    /// Moves the top of the draw pile into a player's hand.
    ///
    /// An empty draw pile is refilled from everything under the top discard
    /// card. If there is still nothing to draw the call does nothing.
    pub fn draw_card(&mut self, player_index: usize) -> Result<(), GameError> {
        self.check_seat(player_index)?;

        if self.draw_pile.is_empty() {
            self.recycle_discard_pile();
        }

        let Some(card) = self.draw_pile.pop() else {
            debug!("Nothing left to draw in game {}", self.id);
            return Ok(());
        };

        let player = &mut self.players[player_index];
        player.add_card(card);
        if player.hand.len() > 1 {
            player.called_uno = false;
        }
        Ok(())
    }

    fn recycle_discard_pile(&mut self) {
        let Some(top) = self.discard_pile.pop() else {
            return;
        };

        let mut recycled = std::mem::replace(&mut self.discard_pile, vec![top]);
        reset_wild_colors(&mut recycled);
        shuffle(&mut recycled, &mut rand::rng());

        debug!(
            "Recycled {} discarded cards into the draw pile of game {}",
            recycled.len(),
            self.id
        );
        self.draw_pile.append(&mut recycled);
    }

    fn draw_cards(&mut self, player_index: usize, count: usize) -> Result<(), GameError> {
        for _ in 0..count {
            self.draw_card(player_index)?;
        }
        Ok(())
    }

    /// Penalises a player holding one card who has not called uno.
    ///
    /// Returns whether the penalty was applied.
    pub fn accuse_uno(&mut self, accused_index: usize) -> Result<bool, GameError> {
        self.check_seat(accused_index)?;

        let accused = &self.players[accused_index];
        if accused.hand.len() != 1 || accused.called_uno {
            return Ok(false);
        }

        info!(
            "Player {} caught without calling uno in game {}",
            accused.username, self.id
        );
        self.draw_cards(accused_index, self.rules.uno_penalty)?;
        Ok(true)
    }

    /// Declares uno for a player down to their last one or two cards.
    pub fn call_uno(&mut self, player_index: usize) -> Result<(), GameError> {
        self.check_seat(player_index)?;

        let player = &mut self.players[player_index];
        if player.hand.len() > 2 {
            return Err(GameError::UnoNotAllowed(player.hand.len()));
        }
        player.called_uno = true;
        Ok(())
    }

    /// Passes the turn one seat along without touching the direction.
    pub fn skip_turn(&mut self) {
        if self.players.is_empty() {
            return;
        }
        self.current_player = next_player(
            self.current_player,
            self.players.len(),
            self.direction,
            CardType::Number(0),
        );
    }

    /// Plays `card` from the current player's hand.
    ///
    /// `wild_color` is the color a wild card takes on the discard pile and is
    /// required for wild cards. Nothing is changed unless the play is legal.
    pub fn play_card(&mut self, card: &Card, wild_color: Option<Color>) -> Result<(), GameError> {
        let chosen = wild_color.filter(|c| !c.is_wild());
        if card.color.is_wild() && chosen.is_none() {
            return Err(GameError::WildColorRequired);
        }

        let seat = self.current_player;
        self.check_seat(seat)?;

        // The hand copy is authoritative, not what the caller sent.
        let held = self.players[seat]
            .find_card(card.id)
            .cloned()
            .ok_or(GameError::CardNotFound(card.id))?;
        if held.color.is_wild() && chosen.is_none() {
            return Err(GameError::WildColorRequired);
        }

        if let Some(top) = self.top_card() {
            if !is_playable(&held, top) {
                return Err(GameError::CardNotPlayable);
            }
        }

        let played = self.players[seat].remove_card(held.id)?;
        let player_count = self.players.len();
        let target = next_player(seat, player_count, self.direction, CardType::Number(0));

        let card_type = played.card_type;
        let placed = match card_type {
            CardType::WildAddFour => {
                self.draw_cards(target, self.rules.wild_add_four_penalty)?;
                played.with_color(chosen.unwrap_or(played.color))
            }
            CardType::Wild => played.with_color(chosen.unwrap_or(played.color)),
            CardType::AddTwo => {
                self.draw_cards(target, self.rules.add_two_penalty)?;
                played
            }
            _ => played,
        };

        debug!(
            "Player {} played {:?} {:?} in game {}",
            self.players[seat].username, placed.color, placed.card_type, self.id
        );

        self.discard_pile.push(placed);

        self.current_player = next_player(seat, player_count, self.direction, card_type);
        if card_type == CardType::Reverse {
            self.direction = self.direction.reverse();
        }
        Ok(())
    }

    /// Seat of a player who has emptied their hand, if any.
    pub fn round_winner(&self) -> Option<usize> {
        self.players.iter().position(Player::has_won)
    }

    pub fn new_round(&mut self) -> Vec<usize> {
        self.new_round_with_rng(&mut rand::rng())
    }

    /// Scores the finished round and lays out fresh piles.
    ///
    /// Every empty-handed player receives the full value of all other hands.
    /// Hands come back empty; call [`Game::deal`] to start play.
    pub fn new_round_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<usize> {
        let winners: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.has_won())
            .map(|(i, _)| i)
            .collect();

        let prize_pool: u32 = self
            .players
            .iter()
            .filter(|p| !p.has_won())
            .map(|p| score(&p.hand))
            .sum();

        for &seat in &winners {
            self.players[seat].score += prize_pool;
            info!(
                "Player {} wins the round in game {} (+{})",
                self.players[seat].username, self.id, prize_pool
            );
        }

        for player in self.players.iter_mut() {
            player.hand.clear();
            player.called_uno = false;
        }

        self.reset_piles(rng);
        winners
    }

    /// Projection with the draw pile removed and only the hands of
    /// `visible_usernames` shown.
    pub fn redact_for_viewer<S: AsRef<str>>(&self, visible_usernames: &[S]) -> GameView {
        GameView {
            id: self.id.clone(),
            name: self.name.clone(),
            max_players: self.max_players,
            players: self
                .players
                .iter()
                .map(|p| {
                    let visible = visible_usernames.iter().any(|u| u.as_ref() == p.username);
                    p.view(visible)
                })
                .collect(),
            draw_pile_remaining: self.draw_pile.len(),
            discard_pile: self.discard_pile.clone(),
            direction: self.direction,
            current_player: self.current_player,
        }
    }

    /// Lobby listing: no hands at all.
    pub fn public_view(&self) -> GameView {
        self.redact_for_viewer::<&str>(&[])
    }

    /// Every card id currently in the room, sorted.
    pub fn card_ids(&self) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self
            .draw_pile
            .iter()
            .chain(self.discard_pile.iter())
            .chain(self.players.iter().flat_map(|p| p.hand.iter()))
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

/// Loosely shaped game as read back from storage or the wire.
#[derive(Deserialize)]
struct GameRecord {
    id: String,
    name: String,
    max_players: usize,
    players: Vec<PlayerRecord>,
    draw_pile: Option<Vec<Card>>,
    #[serde(default)]
    discard_pile: Vec<Card>,
    #[serde(default)]
    direction: Direction,
    #[serde(default)]
    current_player: usize,
    #[serde(default)]
    rules: GameRules,
}

#[derive(Deserialize)]
struct PlayerRecord {
    username: String,
    #[serde(default)]
    score: u32,
    hand: Option<Vec<Card>>,
    #[serde(default)]
    called_uno: bool,
    #[serde(default)]
    visible_card_count: u32,
}

impl TryFrom<GameRecord> for Game {
    type Error = GameError;

    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        let draw_pile = record.draw_pile.ok_or(GameError::NoDrawPile)?;

        let players = record
            .players
            .into_iter()
            .enumerate()
            .map(|(seat, p)| {
                let hand = p.hand.ok_or(GameError::CorruptPlayerState(seat))?;
                Ok(Player::with_state(
                    p.username,
                    p.score,
                    hand,
                    p.called_uno,
                    p.visible_card_count,
                ))
            })
            .collect::<Result<Vec<_>, GameError>>()?;

        if !players.is_empty() && record.current_player >= players.len() {
            return Err(GameError::InvalidPlayerIndex(record.current_player));
        }

        Ok(Self {
            id: record.id,
            name: record.name,
            max_players: record.max_players,
            players,
            draw_pile,
            discard_pile: record.discard_pile,
            direction: record.direction,
            current_player: record.current_player,
            rules: record.rules,
        })
    }
}
