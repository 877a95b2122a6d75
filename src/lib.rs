//! # Flip Seven
//!
//! A turn-based push-your-luck card game engine.
//!
//! The engine manages a shared draw pile, per-player hands and banked
//! scores, and the card behaviors that mutate game state: number cards
//! that bust on duplicates, score modifiers applied additively then
//! multiplicatively, and three action cards (Freeze, Flip Three, Second
//! Chance) resolved against externally chosen targets.
//!
//! ## Architecture
//!
//! - [`game::entities`]: cards, the deck and its composition table, and
//!   the per-round player state machine
//! - [`game::functional`]: pure scoring
//! - [`game::resolver`]: action-card resolution and targeting
//! - [`game::round`]: the round controller and game loop
//! - [`ports`]: the async input/output boundary a frontend implements
//! - [`console`]: a thin terminal frontend over those ports
//!
//! The engine is sequential: one turn, and within it one action-card
//! resolution, is in flight at a time. The only suspension points are the
//! two input requests and event delivery.
//!
//! ## Example
//!
//! ```
//! use flip_seven::game::entities::{Card, Modifier};
//! use flip_seven::game::functional::score_hand;
//!
//! let hand = [
//!     Card::Number(4),
//!     Card::Number(7),
//!     Card::Number(2),
//!     Card::Modifier(Modifier::Plus(10)),
//!     Card::Modifier(Modifier::Times(2)),
//! ];
//! assert_eq!(score_hand(&hand), 46);
//! ```

/// Console frontend implementing both ports.
pub mod console;

/// Core game logic, entities, and the round controller.
pub mod game;

/// Abstract ports between the engine and a presentation layer.
pub mod ports;

pub use game::{
    EngineError, FlipSevenGame, GameSettings, PortError, constants, entities, functional,
};
pub use ports::{GameEvent, InputPort, OutputPort, TurnDecision};
