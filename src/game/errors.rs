//! Engine error taxonomy.
//!
//! Busts, consumed second chances, and wasted action cards are ordinary
//! game outcomes, not errors; they travel through [`crate::ports::GameEvent`].
//! An off-list target selection is recovered inside the resolver by
//! re-issuing the request and never appears here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::PlayerId;

/// Errors a port implementation can surface to the engine.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum PortError {
    /// The input source can no longer respond (disconnected frontend).
    /// Fatal to the round in progress.
    #[error("input source is no longer available")]
    InputUnavailable,
}

/// Errors that abort the round in progress.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum EngineError {
    /// A draw was attempted with no cards remaining. The fixed
    /// composition accounts for every card, so this is unreachable
    /// without a house-rule change and is treated as fatal.
    #[error("the draw pile is empty")]
    EmptyDeck,
    /// A round-only operation was invoked on a player outside the
    /// `Active` state. Caller contract violation, not a game condition.
    #[error("player {0} is not active")]
    NotActive(PlayerId),
    /// An operation referenced a player id the controller does not own.
    #[error("no player with id {0}")]
    NoSuchPlayer(PlayerId),
    #[error(transparent)]
    Port(#[from] PortError),
}
