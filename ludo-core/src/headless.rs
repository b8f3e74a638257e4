//! Headless game driver for programmatic use.
//!
//! This module runs complete games without a UI. It's designed for:
//! - Automated testing of full playthroughs
//! - Bots and scripts driving every seat
//! - Soak runs that exercise the rules at volume
//!
//! The driver owns the clock the engine deliberately does not have: in
//! real-time mode it sleeps out each deferred delay before firing, in
//! immediate mode it fires right away.
//!
//! # Example
//!
//! ```ignore
//! use ludo_core::headless::{HeadlessConfig, HeadlessGame};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HeadlessConfig::default().with_seed(42);
//!     let mut game = HeadlessGame::new(config);
//!
//!     let winners = game.play_to_end(50_000).await?;
//!     println!("finishing order: {winners:?}");
//!
//!     game.save("finished_game.json").await?;
//!     Ok(())
//! }
//! ```

use crate::dice::{DieRoller, FairDie, SeededDie};
use crate::engine::{EngineConfig, GameEngine};
use crate::events::GameEvent;
use crate::persist::{load_or_new, PersistError, SavedGame};
use crate::players::Roster;
use crate::state::PlayerColor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Errors from driving a game to completion.
#[derive(Debug, Error)]
pub enum HeadlessError {
    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("game did not finish within {0} steps")]
    Stalled(u64),
}

/// How the driver picks among movable tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovePolicy {
    /// Always move the lowest-numbered movable token.
    #[default]
    FirstMovable,
    /// Pick a movable token at random.
    Random,
}

/// Configuration for a headless game.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Who is playing; the driver acts for every seat.
    pub roster: Roster,
    /// Engine tunables, including deferred-action delays.
    pub engine: EngineConfig,
    /// Seed for the die and the move policy. `None` rolls from entropy.
    pub seed: Option<u64>,
    /// How moves are chosen when more than one token can go.
    pub policy: MovePolicy,
    /// Sleep out deferred delays instead of firing immediately.
    pub realtime: bool,
    /// Write a snapshot here after every transition.
    pub autosave: Option<PathBuf>,
}

impl HeadlessConfig {
    /// Defaults for a roster: immediate mode, first-movable, no autosave.
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            engine: EngineConfig::default(),
            seed: None,
            policy: MovePolicy::FirstMovable,
            realtime: false,
            autosave: None,
        }
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_policy(mut self, policy: MovePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    pub fn with_autosave(mut self, path: impl Into<PathBuf>) -> Self {
        self.autosave = Some(path.into());
        self
    }
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self::new(Roster::standard())
    }
}

/// A game that plays itself, one transition per step.
pub struct HeadlessGame {
    engine: GameEngine,
    die: Box<dyn DieRoller + Send>,
    rng: StdRng,
    policy: MovePolicy,
    realtime: bool,
    autosave: Option<PathBuf>,
    game_id: Uuid,
    /// Every event the game has produced, in order.
    transcript: Vec<GameEvent>,
}

impl HeadlessGame {
    /// Start a fresh game under the given configuration.
    pub fn new(config: HeadlessConfig) -> Self {
        let engine = GameEngine::with_config(config.roster, config.engine);
        Self::wrap(engine, Uuid::new_v4(), config.seed, config.policy, config.realtime, config.autosave)
    }

    /// Continue from a snapshot, or start fresh when it cannot be read.
    pub async fn load(path: impl AsRef<Path>, config: HeadlessConfig) -> Self {
        let (game_id, engine) = load_or_new(path, config.roster, config.engine).await;
        Self::wrap(engine, game_id, config.seed, config.policy, config.realtime, config.autosave)
    }

    fn wrap(
        engine: GameEngine,
        game_id: Uuid,
        seed: Option<u64>,
        policy: MovePolicy,
        realtime: bool,
        autosave: Option<PathBuf>,
    ) -> Self {
        let die: Box<dyn DieRoller + Send> = match seed {
            Some(seed) => Box::new(SeededDie::new(seed)),
            None => Box::new(FairDie::new()),
        };
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            engine,
            die,
            rng,
            policy,
            realtime,
            autosave,
            game_id,
            transcript: Vec::new(),
        }
    }

    /// Advance the game by one transition.
    ///
    /// Fires whatever is pending (sleeping first in real-time mode), rolls
    /// when no roll is pending, and otherwise moves a token chosen by the
    /// configured policy. A finished game steps to nothing.
    pub async fn step(&mut self) -> Result<Vec<GameEvent>, HeadlessError> {
        if self.engine.is_over() {
            return Ok(Vec::new());
        }

        let events = if let Some(action) = self.engine.pending_action().cloned() {
            if self.realtime {
                tokio::time::sleep(action.delay).await;
            }
            self.engine.fire(&action)
        } else if self.engine.state().dice_value.is_none() {
            let face = self.die.roll();
            self.engine.roll_dice(face)
        } else {
            let movable = self.engine.current_movable_tokens();
            match self.pick(&movable) {
                Some(token) => self.engine.move_token(token),
                None => Vec::new(),
            }
        };

        if !events.is_empty() {
            if let Some(path) = self.autosave.clone() {
                SavedGame::new(self.game_id, &self.engine)
                    .save_json(&path)
                    .await?;
            }
            self.transcript.extend(events.iter().cloned());
        }

        Ok(events)
    }

    /// Step until the game is over.
    ///
    /// Returns the finishing order, or [`HeadlessError::Stalled`] when the
    /// game is still running after `max_steps` transitions.
    pub async fn play_to_end(&mut self, max_steps: u64) -> Result<Vec<PlayerColor>, HeadlessError> {
        for _ in 0..max_steps {
            self.step().await?;
            if self.engine.is_over() {
                return Ok(self.engine.state().winners.clone());
            }
        }
        Err(HeadlessError::Stalled(max_steps))
    }

    /// Write a snapshot of the game as it stands.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), HeadlessError> {
        SavedGame::new(self.game_id, &self.engine)
            .save_json(path)
            .await?;
        Ok(())
    }

    fn pick(&mut self, movable: &[crate::state::TokenId]) -> Option<crate::state::TokenId> {
        match self.policy {
            MovePolicy::FirstMovable => movable.first().copied(),
            MovePolicy::Random => {
                if movable.is_empty() {
                    None
                } else {
                    Some(movable[self.rng.gen_range(0..movable.len())])
                }
            }
        }
    }

    // ========================================================================
    // Game State Queries
    // ========================================================================

    /// Stable identity of this playthrough across saves.
    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    /// The engine being driven.
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Mutable access to the engine for manual interventions.
    pub fn engine_mut(&mut self) -> &mut GameEngine {
        &mut self.engine
    }

    pub fn is_over(&self) -> bool {
        self.engine.is_over()
    }

    /// Colors that have finished so far, in order.
    pub fn winners(&self) -> &[PlayerColor] {
        &self.engine.state().winners
    }

    /// Every event produced since the driver started.
    pub fn transcript(&self) -> &[GameEvent] {
        &self.transcript
    }

    /// The most recent event, if any.
    pub fn last_event(&self) -> Option<&GameEvent> {
        self.transcript.last()
    }
}
