//! Action-card resolution.
//!
//! The resolver borrows the deck, the authoritative player list, and both
//! ports from the round controller for the duration of one resolution, so
//! players never hold references to one another. Resolution is strictly
//! sequential: a Flip Three drawn mid-sequence resolves to completion
//! before the outer forced draws continue.

use log::{debug, warn};
use std::{future::Future, pin::Pin};

use super::constants::FLIP_THREE_DRAWS;
use super::entities::{ActionKind, Card, Deck, FlipOutcome, Player, PlayerId, PlayerView};
use super::errors::{EngineError, PortError};
use crate::ports::{GameEvent, InputPort, OutputPort};

pub struct ActionResolver<'a, I, O> {
    pub deck: &'a mut Deck,
    pub players: &'a mut [Player],
    pub input: &'a mut I,
    pub output: &'a mut O,
    /// Whether action cards may target the drawing player while other
    /// active players remain. Opponents-only by default.
    pub allow_self_target: bool,
}

impl<I: InputPort, O: OutputPort> ActionResolver<'_, I, O> {
    fn player(&self, id: PlayerId) -> Result<&Player, EngineError> {
        self.players
            .iter()
            .find(|p| p.id() == id)
            .ok_or(EngineError::NoSuchPlayer(id))
    }

    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, EngineError> {
        self.players
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(EngineError::NoSuchPlayer(id))
    }

    /// Perform one flip for `id`: draw, classify, announce, and resolve
    /// any drawn action card before returning.
    pub async fn flip_once(&mut self, id: PlayerId) -> Result<(), EngineError> {
        let outcome = {
            let deck = &mut *self.deck;
            self.players
                .iter_mut()
                .find(|p| p.id() == id)
                .ok_or(EngineError::NoSuchPlayer(id))?
                .flip(deck)?
        };
        let name = self.player(id)?.name().clone();
        match outcome {
            FlipOutcome::Flipped(card) => {
                self.output
                    .announce(GameEvent::CardDrawn { player: name, card })
                    .await;
            }
            FlipOutcome::DuplicateSaved(card) => {
                self.output
                    .announce(GameEvent::CardDrawn {
                        player: name.clone(),
                        card,
                    })
                    .await;
                self.output
                    .announce(GameEvent::SecondChanceConsumed { player: name })
                    .await;
            }
            FlipOutcome::Busted(card) => {
                self.output
                    .announce(GameEvent::CardDrawn {
                        player: name.clone(),
                        card,
                    })
                    .await;
                self.output
                    .announce(GameEvent::Busted { player: name })
                    .await;
            }
            FlipOutcome::SevenUnique { card, score } => {
                self.output
                    .announce(GameEvent::CardDrawn {
                        player: name.clone(),
                        card,
                    })
                    .await;
                self.output
                    .announce(GameEvent::Stayed {
                        player: name,
                        score,
                    })
                    .await;
            }
            FlipOutcome::Action(kind) => {
                self.output
                    .announce(GameEvent::CardDrawn {
                        player: name,
                        card: Card::Action(kind),
                    })
                    .await;
                // Action cards never join a hand; they sit with the deck's
                // discards until the round ends.
                self.deck.discard(Card::Action(kind));
                self.resolve(id, kind).await?;
            }
        }
        Ok(())
    }

    /// Resolve a drawn action card for `source`.
    ///
    /// Boxed because Flip Three resolution recurses through
    /// [`ActionResolver::flip_once`].
    pub fn resolve<'b>(
        &'b mut self,
        source: PlayerId,
        kind: ActionKind,
    ) -> Pin<Box<dyn Future<Output = Result<(), EngineError>> + Send + 'b>> {
        Box::pin(async move {
            debug!("resolving {kind} drawn by player {source}");
            match kind {
                ActionKind::SecondChance => {
                    let player = self.player_mut(source)?;
                    let name = player.name().clone();
                    if player.grant_second_chance() {
                        self.output
                            .announce(GameEvent::SecondChanceGranted { player: name })
                            .await;
                    } else {
                        debug!("{name} already holds a second chance; token discarded");
                    }
                }
                ActionKind::Freeze => {
                    if let Some(target) = self.choose_target(source).await? {
                        let player = self.player_mut(target)?;
                        let name = player.name().clone();
                        let score = player.freeze()?;
                        self.output
                            .announce(GameEvent::Frozen {
                                player: name,
                                score,
                            })
                            .await;
                    } else {
                        debug!("no eligible target for {kind}; effect wasted");
                    }
                }
                ActionKind::FlipThree => {
                    if let Some(target) = self.choose_target(source).await? {
                        self.forced_draws(target).await?;
                    } else {
                        debug!("no eligible target for {kind}; effect wasted");
                    }
                }
            }
            Ok(())
        })
    }

    /// Force up to three draws on `target`, stopping the moment the
    /// target leaves the active state (bust, seven-unique, or a freeze
    /// landing mid-sequence).
    async fn forced_draws(&mut self, target: PlayerId) -> Result<(), EngineError> {
        for _ in 0..FLIP_THREE_DRAWS {
            if !self.player(target)?.is_active() {
                break;
            }
            self.flip_once(target).await?;
        }
        Ok(())
    }

    /// Present the active opponents of `source` and await a selection.
    ///
    /// Returns `None` when no eligible target exists (the effect is
    /// wasted). An off-list selection is rejected and re-requested; it
    /// never surfaces past the resolver.
    async fn choose_target(&mut self, source: PlayerId) -> Result<Option<PlayerId>, EngineError> {
        let eligible: Vec<PlayerView> = self
            .players
            .iter()
            .filter(|p| p.is_active() && (self.allow_self_target || p.id() != source))
            .map(Player::view)
            .collect();
        if eligible.is_empty() {
            return Ok(None);
        }
        loop {
            match self.input.request_target(&eligible).await {
                Ok(id) if eligible.iter().any(|view| view.id == id) => return Ok(Some(id)),
                Ok(id) => {
                    warn!("rejecting target {id}: not an eligible active opponent");
                }
                Err(PortError::InputUnavailable) => {
                    return Err(EngineError::Port(PortError::InputUnavailable));
                }
            }
        }
    }
}
