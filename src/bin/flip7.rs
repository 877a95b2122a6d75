//! Play Flip Seven at the terminal.

use anyhow::Result;
use pico_args::Arguments;

use flip_seven::{
    FlipSevenGame, GameSettings,
    console::{ConsoleInput, ConsoleOutput},
    game::entities::Username,
};

const HELP: &str = "\
Play Flip Seven at the terminal

USAGE:
  flip7 [OPTIONS]

OPTIONS:
  --players NAMES       Comma-separated player names  [default: alice,bob]
  --self-target         Allow action cards to target the drawing player

FLAGS:
  -h, --help            Print help information
";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut pargs = Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }
    let names: String = pargs
        .value_from_str("--players")
        .unwrap_or_else(|_| "alice,bob".to_string());
    let allow_self_target = pargs.contains("--self-target");
    let names: Vec<Username> = names.split(',').map(Username::new).collect();
    anyhow::ensure!(names.len() >= 2, "need at least two players");

    let settings = GameSettings {
        allow_self_target,
        ..GameSettings::default()
    };
    let mut game = FlipSevenGame::new(names, settings, ConsoleInput::new(), ConsoleOutput);
    let winner = game.run().await?;
    if let Some(player) = game.players().iter().find(|p| p.id() == winner) {
        println!("final: {player}");
    }
    Ok(())
}
