//! Four-player Ludo rules engine.
//!
//! This crate provides:
//! - Complete Ludo movement, capture, and win mechanics
//! - An engine instance owning all game state, no globals
//! - Cancellable deferred actions instead of timers
//! - JSON persistence for suspend and resume
//!
//! # Quick Start
//!
//! ```ignore
//! use ludo_core::{DieFace, GameEngine, Roster};
//!
//! let mut engine = GameEngine::new(Roster::standard());
//!
//! for event in engine.roll_dice(DieFace::SIX) {
//!     println!("{event}");
//! }
//! if let Some(token) = engine.current_movable_tokens().first().copied() {
//!     for event in engine.move_token(token) {
//!         println!("{event}");
//!     }
//! }
//! if let Some(action) = engine.pending_action().cloned() {
//!     // the host sleeps out action.delay, then:
//!     engine.fire(&action);
//! }
//! ```

pub mod board;
pub mod coords;
pub mod dice;
pub mod engine;
pub mod events;
pub mod headless;
pub mod persist;
pub mod players;
pub mod state;
pub mod testing;

// Primary public API
pub use dice::{DieFace, DieRoller, FairDie, SeededDie};
pub use engine::{CancelToken, DeferredAction, DeferredKind, EngineConfig, GameEngine, WinRule};
pub use events::{GameEvent, PassReason};
pub use headless::{HeadlessConfig, HeadlessError, HeadlessGame, MovePolicy};
pub use persist::{auto_save_path, load_or_new, PersistError, SavedGame};
pub use players::{PlayerConfig, PlayerKind, Roster, RosterError};
pub use state::{
    GameState, GameStatus, PlayerColor, PlayerStats, Token, TokenId, TokenStatus,
};
pub use testing::{ScriptedDie, TestGame};
