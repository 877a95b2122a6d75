//! Abstract collaborator ports between the engine and any presentation
//! layer.
//!
//! The engine is logically single-threaded: at most one input request is
//! outstanding at any time, and announcements are awaited before the next
//! input request that depends on them, so a frontend always sees events in
//! the order they happened.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::entities::{Card, PlayerId, PlayerView, Username};
use crate::game::errors::PortError;

/// A player's choice on their turn.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum TurnDecision {
    Flip,
    Stay,
}

impl fmt::Display for TurnDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Flip => "flip",
            Self::Stay => "stay",
        };
        write!(f, "{repr}")
    }
}

/// Events that occur during gameplay, announced through the output port.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    CardDrawn { player: Username, card: Card },
    Busted { player: Username },
    Stayed { player: Username, score: u32 },
    Frozen { player: Username, score: u32 },
    SecondChanceGranted { player: Username },
    SecondChanceConsumed { player: Username },
    RoundEnded,
    GameWon { player: Username },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::CardDrawn { player, card } => format!("{player} flips {card}"),
            Self::Busted { player } => format!("{player} busts"),
            Self::Stayed { player, score } => format!("{player} stays with {score}"),
            Self::Frozen { player, score } => {
                format!("{player} is frozen with {score} banked")
            }
            Self::SecondChanceGranted { player } => {
                format!("{player} gains a second chance")
            }
            Self::SecondChanceConsumed { player } => {
                format!("{player} uses their second chance")
            }
            Self::RoundEnded => "the round is over".to_string(),
            Self::GameWon { player } => format!("{player} wins the game"),
        };
        write!(f, "{repr}")
    }
}

/// Source of player decisions. Both requests park the engine until a
/// response arrives; reporting [`PortError::InputUnavailable`] aborts the
/// round in progress.
#[async_trait]
pub trait InputPort: Send {
    /// Ask the given player for their turn decision.
    async fn request_turn_decision(
        &mut self,
        player: &PlayerView,
    ) -> Result<TurnDecision, PortError>;

    /// Ask for an action card target among `opponents` (ordered,
    /// currently-active). A selection outside the list is rejected by the
    /// engine and re-requested.
    async fn request_target(&mut self, opponents: &[PlayerView]) -> Result<PlayerId, PortError>;
}

/// Sink for game events. Fire-and-forget from the engine's perspective,
/// but awaited so delivery order matches event order.
#[async_trait]
pub trait OutputPort: Send {
    async fn announce(&mut self, event: GameEvent);
}
