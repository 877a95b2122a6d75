//! Scripted port implementations shared by the integration tests.

use async_trait::async_trait;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use flip_seven::{
    GameEvent, InputPort, OutputPort, PortError, TurnDecision,
    entities::{PlayerId, PlayerView},
};

/// Input port that replays pre-recorded decisions and targets, reporting
/// `InputUnavailable` when the script runs out.
pub struct ScriptedInput {
    decisions: VecDeque<TurnDecision>,
    targets: VecDeque<PlayerId>,
}

impl ScriptedInput {
    pub fn new(decisions: &[TurnDecision], targets: &[PlayerId]) -> Self {
        Self {
            decisions: decisions.iter().copied().collect(),
            targets: targets.iter().copied().collect(),
        }
    }
}

#[async_trait]
impl InputPort for ScriptedInput {
    async fn request_turn_decision(
        &mut self,
        _player: &PlayerView,
    ) -> Result<TurnDecision, PortError> {
        self.decisions
            .pop_front()
            .ok_or(PortError::InputUnavailable)
    }

    async fn request_target(&mut self, _opponents: &[PlayerView]) -> Result<PlayerId, PortError> {
        self.targets.pop_front().ok_or(PortError::InputUnavailable)
    }
}

/// Output port that records every announcement for later inspection.
pub struct RecordingOutput {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl RecordingOutput {
    pub fn new() -> (Self, Arc<Mutex<Vec<GameEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                events: Arc::clone(&events),
            },
            events,
        )
    }
}

#[async_trait]
impl OutputPort for RecordingOutput {
    async fn announce(&mut self, event: GameEvent) {
        self.events.lock().unwrap().push(event);
    }
}
