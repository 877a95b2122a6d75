//! Round controller: drives rounds to completion over the ports.
//!
//! One round runs Setup (reset, shuffle), InProgress (round-robin turns
//! until no player is active), then RoundEnd (hands and discards rejoin
//! the deck). The game ends when a round leaves some player at or above
//! the target score; otherwise the next round reuses the same deck,
//! reshuffled but never rebuilt.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::entities::{Deck, DeckComposition, Player, PlayerId, Username};
use super::errors::EngineError;
use super::resolver::ActionResolver;
use crate::ports::{GameEvent, InputPort, OutputPort, TurnDecision};

/// Game configuration settings.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct GameSettings {
    pub composition: DeckComposition,
    /// Whether action cards may target the drawing player while other
    /// active players remain.
    pub allow_self_target: bool,
}

/// A Flip Seven game: the deck, the authoritative player list, and the
/// two presentation ports. Deck and player state are owned and mutated
/// exclusively here.
#[derive(Debug)]
pub struct FlipSevenGame<I, O> {
    settings: GameSettings,
    deck: Deck,
    players: Vec<Player>,
    input: I,
    output: O,
    round: u32,
}

impl<I: InputPort, O: OutputPort> FlipSevenGame<I, O> {
    #[must_use]
    pub fn new(names: Vec<Username>, settings: GameSettings, input: I, output: O) -> Self {
        let mut deck = Deck::build(&settings.composition);
        deck.shuffle();
        Self::with_deck(deck, names, settings, input, output)
    }

    /// Build a game around an explicit deck, which is not shuffled before
    /// the first round. Useful for scripted games and tests.
    #[must_use]
    pub fn with_deck(
        deck: Deck,
        names: Vec<Username>,
        settings: GameSettings,
        input: I,
        output: O,
    ) -> Self {
        let players = names
            .into_iter()
            .enumerate()
            .map(|(id, name)| Player::new(id, name))
            .collect();
        Self {
            settings,
            deck,
            players,
            input,
            output,
            round: 0,
        }
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        self.round
    }

    /// Play rounds until a player reaches the target score, then announce
    /// and return the winner (highest banked total on ties).
    pub async fn run(&mut self) -> Result<PlayerId, EngineError> {
        loop {
            self.play_round().await?;
            if let Some(winner) = self.winner() {
                let (id, name) = (winner.id(), winner.name().clone());
                info!("{name} wins after {} rounds", self.round);
                self.output
                    .announce(GameEvent::GameWon { player: name })
                    .await;
                return Ok(id);
            }
        }
    }

    /// Play a single round to completion.
    ///
    /// On error (lost input, empty deck) the round is aborted: nothing is
    /// banked for the interrupted player, while scores already banked
    /// this round stand.
    pub async fn play_round(&mut self) -> Result<(), EngineError> {
        self.round += 1;
        info!(
            "round {} begins with {} cards in the deck",
            self.round,
            self.deck.len()
        );
        loop {
            let mut any_active = false;
            for idx in 0..self.players.len() {
                // A player active at loop start may have been busted or
                // frozen by an earlier turn's action card.
                if !self.players[idx].is_active() {
                    continue;
                }
                any_active = true;
                self.take_turn(idx).await?;
            }
            if !any_active {
                break;
            }
        }
        self.end_round().await;
        Ok(())
    }

    async fn take_turn(&mut self, idx: usize) -> Result<(), EngineError> {
        let view = self.players[idx].view();
        let decision = self.input.request_turn_decision(&view).await?;
        debug!("{} chooses to {decision}", view.name);
        match decision {
            TurnDecision::Stay => {
                let score = self.players[idx].stay()?;
                let name = self.players[idx].name().clone();
                self.output
                    .announce(GameEvent::Stayed {
                        player: name,
                        score,
                    })
                    .await;
            }
            TurnDecision::Flip => {
                let id = self.players[idx].id();
                let mut resolver = ActionResolver {
                    deck: &mut self.deck,
                    players: &mut self.players,
                    input: &mut self.input,
                    output: &mut self.output,
                    allow_self_target: self.settings.allow_self_target,
                };
                resolver.flip_once(id).await?;
            }
        }
        Ok(())
    }

    /// Return every hand and the resolved action cards to the deck, reset
    /// players, and reshuffle for the next round.
    async fn end_round(&mut self) {
        for player in &mut self.players {
            let cards = player.reset();
            self.deck.return_cards(cards);
        }
        self.deck.recycle_discards();
        self.deck.shuffle();
        debug_assert_eq!(self.deck.len(), self.deck.built());
        self.output.announce(GameEvent::RoundEnded).await;
    }

    fn winner(&self) -> Option<&Player> {
        self.players
            .iter()
            .filter(|p| p.won_game())
            .max_by_key(|p| p.total_score())
    }
}
