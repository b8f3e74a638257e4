//! Play a complete random game and print the highlights.
//!
//! Run with: `cargo run -p ludo-core --example random_game -- [seed]`

use ludo_core::headless::{HeadlessConfig, HeadlessGame, MovePolicy};
use ludo_core::GameEvent;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(2024);

    println!("=== Ludo: random game (seed {seed}) ===\n");

    let config = HeadlessConfig::default()
        .with_seed(seed)
        .with_policy(MovePolicy::Random);
    let mut game = HeadlessGame::new(config);

    let winners = game.play_to_end(500_000).await?;

    for event in game.transcript() {
        match event {
            GameEvent::TokenCaptured { .. }
            | GameEvent::TokenFinished { .. }
            | GameEvent::PlayerWon { .. }
            | GameEvent::TurnForfeited { .. }
            | GameEvent::GameOver { .. } => println!("{event}"),
            _ => {}
        }
    }

    let rolls = game
        .transcript()
        .iter()
        .filter(|e| matches!(e, GameEvent::DiceRolled { .. }))
        .count();
    let captures = game
        .transcript()
        .iter()
        .filter(|e| matches!(e, GameEvent::TokenCaptured { .. }))
        .count();

    println!("\n=== Final standings ===");
    for (index, color) in winners.iter().enumerate() {
        let name = game
            .engine()
            .roster()
            .seat(*color)
            .map(|seat| seat.name.as_str())
            .unwrap_or("?");
        println!("{}. {color} ({name})", index + 1);
    }
    println!("\n{rolls} rolls, {captures} captures");

    Ok(())
}
