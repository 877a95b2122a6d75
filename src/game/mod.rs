//! Flip Seven round engine.
//!
//! This module provides the core game implementation:
//! - Card taxonomy and the configurable deck composition
//! - The shared draw pile with conservation across rounds
//! - The per-round player state machine (Active, Busted, Stayed, Frozen)
//! - Action-card resolution with external target selection
//! - The round controller and game loop

pub mod constants;
pub mod entities;
pub mod errors;
pub mod functional;
pub mod resolver;
pub mod round;

pub use errors::{EngineError, PortError};
pub use round::{FlipSevenGame, GameSettings};
