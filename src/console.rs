//! Line-oriented console implementations of the two engine ports.
//!
//! Deliberately thin: the engine never knows how decisions are gathered
//! or events shown, and nothing here touches engine-owned state.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::game::entities::{PlayerId, PlayerView};
use crate::game::errors::PortError;
use crate::ports::{GameEvent, InputPort, OutputPort, TurnDecision};

pub struct ConsoleInput {
    lines: Lines<BufReader<Stdin>>,
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleInput {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn next_line(&mut self) -> Result<String, PortError> {
        // EOF means the player-facing side is gone.
        self.lines
            .next_line()
            .await
            .map_err(|_| PortError::InputUnavailable)?
            .ok_or(PortError::InputUnavailable)
    }
}

#[async_trait]
impl InputPort for ConsoleInput {
    async fn request_turn_decision(
        &mut self,
        player: &PlayerView,
    ) -> Result<TurnDecision, PortError> {
        let hand = player
            .hand
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        let token = if player.has_second_chance {
            ", second chance in hand"
        } else {
            ""
        };
        println!(
            "{}: hand [{hand}] worth {}, {} banked{token}",
            player.name, player.hand_score, player.total_score
        );
        loop {
            println!("flip or stay?");
            match self.next_line().await?.trim().to_lowercase().as_str() {
                "f" | "flip" | "hit" => return Ok(TurnDecision::Flip),
                "s" | "stay" => return Ok(TurnDecision::Stay),
                other => println!("unrecognized input {other:?}"),
            }
        }
    }

    async fn request_target(&mut self, opponents: &[PlayerView]) -> Result<PlayerId, PortError> {
        println!("choose a target:");
        for (choice, view) in opponents.iter().enumerate() {
            println!(
                "  [{choice}] {} (hand worth {}, {} banked)",
                view.name, view.hand_score, view.total_score
            );
        }
        loop {
            if let Ok(choice) = self.next_line().await?.trim().parse::<usize>() {
                if let Some(view) = opponents.get(choice) {
                    return Ok(view.id);
                }
            }
            println!("enter a number between 0 and {}", opponents.len() - 1);
        }
    }
}

pub struct ConsoleOutput;

#[async_trait]
impl OutputPort for ConsoleOutput {
    async fn announce(&mut self, event: GameEvent) {
        println!("{event}");
    }
}
