//! Testing utilities for the rules engine.
//!
//! This module provides tools for integration testing:
//! - `ScriptedDie` for deterministic rolls without randomness
//! - `TestGame` for scripted game scenarios
//! - Assertion helpers for verifying board state

use crate::dice::{DieFace, DieRoller};
use crate::engine::{DeferredAction, EngineConfig, GameEngine};
use crate::events::GameEvent;
use crate::players::Roster;
use crate::state::{PlayerColor, Token, TokenId, TokenStatus};

/// A die that returns scripted faces.
///
/// Use this for deterministic tests without randomness. Once the script
/// is exhausted every further roll is a one.
pub struct ScriptedDie {
    /// Scripted faces to return in order.
    faces: Vec<DieFace>,
    /// Index of next face to return.
    face_index: usize,
}

impl ScriptedDie {
    /// Create a new scripted die.
    pub fn new(faces: Vec<DieFace>) -> Self {
        Self {
            faces,
            face_index: 0,
        }
    }

    /// Create a scripted die from raw values; anything outside 1..=6
    /// rolls as a one.
    pub fn of(values: &[u8]) -> Self {
        Self::new(
            values
                .iter()
                .map(|&v| DieFace::new(v).unwrap_or(DieFace::ONE))
                .collect(),
        )
    }

    /// Add a face to the queue.
    pub fn queue(&mut self, face: DieFace) {
        self.faces.push(face);
    }

    /// Reset the face index to replay from the beginning.
    pub fn reset(&mut self) {
        self.face_index = 0;
    }

    /// How many scripted faces are left.
    pub fn remaining(&self) -> usize {
        self.faces.len().saturating_sub(self.face_index)
    }
}

impl DieRoller for ScriptedDie {
    fn roll(&mut self) -> DieFace {
        if self.face_index < self.faces.len() {
            let face = self.faces[self.face_index];
            self.face_index += 1;
            face
        } else {
            DieFace::ONE
        }
    }
}

/// Test harness for running game scenarios.
pub struct TestGame {
    /// The engine under test.
    pub engine: GameEngine,
    /// The scripted die feeding it.
    pub die: ScriptedDie,
}

impl TestGame {
    /// Create a new test game with the standard four-player roster.
    pub fn new() -> Self {
        Self::with_roster(Roster::standard())
    }

    /// Create a test game with a custom roster.
    pub fn with_roster(roster: Roster) -> Self {
        Self {
            engine: GameEngine::new(roster),
            die: ScriptedDie::new(Vec::new()),
        }
    }

    /// Create a test game with a custom roster and configuration.
    pub fn with_config(roster: Roster, config: EngineConfig) -> Self {
        Self {
            engine: GameEngine::with_config(roster, config),
            die: ScriptedDie::new(Vec::new()),
        }
    }

    /// Queue die faces for upcoming rolls.
    pub fn script(&mut self, values: &[u8]) -> &mut Self {
        for &value in values {
            self.die.queue(DieFace::new(value).unwrap_or(DieFace::ONE));
        }
        self
    }

    /// Put a token wherever a scenario needs it.
    ///
    /// Rebuilds the engine around the edited state; anything that was
    /// pending is dropped and rescheduled from the new state, as on a
    /// resume.
    pub fn place(&mut self, color: PlayerColor, token: TokenId, position: i8) -> &mut Self {
        let mut state = self.engine.state().clone();
        state.tokens[color.index()][token.0 as usize] = Token {
            id: token,
            position,
            status: status_for(position),
        };
        self.rebuild(state);
        self
    }

    /// Hand the turn to a color without playing out the rotation.
    pub fn set_turn(&mut self, color: PlayerColor) -> &mut Self {
        let mut state = self.engine.state().clone();
        state.current_turn = color;
        state.dice_value = None;
        state.sixes_streak = 0;
        self.rebuild(state);
        self
    }

    /// Roll the next scripted face for the current player.
    pub fn roll(&mut self) -> Vec<GameEvent> {
        let face = self.die.roll();
        self.engine.roll_dice(face)
    }

    /// Roll a specific face for the current player.
    pub fn roll_face(&mut self, face: DieFace) -> Vec<GameEvent> {
        self.engine.roll_dice(face)
    }

    /// Move one of the current player's tokens.
    pub fn move_token(&mut self, token: u8) -> Vec<GameEvent> {
        self.engine.move_token(TokenId(token))
    }

    /// Execute whatever the engine has scheduled, without waiting.
    ///
    /// Returns no events when nothing is pending.
    pub fn fire_pending(&mut self) -> Vec<GameEvent> {
        match self.pending() {
            Some(action) => self.engine.fire(&action),
            None => Vec::new(),
        }
    }

    /// Snapshot the currently scheduled action.
    pub fn pending(&self) -> Option<DeferredAction> {
        self.engine.pending_action().cloned()
    }

    /// Color whose turn it is.
    pub fn current_color(&self) -> PlayerColor {
        self.engine.current_color()
    }

    /// Where a token stands on its color-relative track.
    pub fn token_position(&self, color: PlayerColor, token: u8) -> i8 {
        self.engine.state().tokens[color.index()][token as usize].position
    }

    /// A token's lifecycle state.
    pub fn token_status(&self, color: PlayerColor, token: u8) -> TokenStatus {
        self.engine.state().tokens[color.index()][token as usize].status
    }

    /// Colors that have finished, in finishing order.
    pub fn winners(&self) -> &[PlayerColor] {
        &self.engine.state().winners
    }

    pub fn is_over(&self) -> bool {
        self.engine.is_over()
    }

    fn rebuild(&mut self, state: crate::state::GameState) {
        self.engine = GameEngine::resume(
            self.engine.roster().clone(),
            state,
            self.engine.config().clone(),
        );
    }
}

impl Default for TestGame {
    fn default() -> Self {
        Self::new()
    }
}

fn status_for(position: i8) -> TokenStatus {
    use crate::board::{BASE_POSITION, FINISH_LINE};
    if position == BASE_POSITION {
        TokenStatus::AtBase
    } else if position == FINISH_LINE {
        TokenStatus::Finished
    } else {
        TokenStatus::Active
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that a token stands at an exact track position.
#[track_caller]
pub fn assert_token_at(game: &TestGame, color: PlayerColor, token: u8, position: i8) {
    let actual = game.token_position(color, token);
    assert_eq!(
        actual, position,
        "Expected {color} token {token} at {position}, got {actual}"
    );
}

/// Assert that a token is resting in its base.
#[track_caller]
pub fn assert_at_base(game: &TestGame, color: PlayerColor, token: u8) {
    let status = game.token_status(color, token);
    assert_eq!(
        status,
        TokenStatus::AtBase,
        "Expected {color} token {token} at base, got {status:?}"
    );
}

/// Assert that a token has reached the center.
#[track_caller]
pub fn assert_finished(game: &TestGame, color: PlayerColor, token: u8) {
    let status = game.token_status(color, token);
    assert_eq!(
        status,
        TokenStatus::Finished,
        "Expected {color} token {token} finished, got {status:?}"
    );
}

/// Assert whose turn it is.
#[track_caller]
pub fn assert_turn(game: &TestGame, color: PlayerColor) {
    let actual = game.current_color();
    assert_eq!(actual, color, "Expected {color} to play, got {actual}");
}

/// Assert the finishing order so far.
#[track_caller]
pub fn assert_winners(game: &TestGame, expected: &[PlayerColor]) {
    assert_eq!(
        game.winners(),
        expected,
        "Expected winners {expected:?}, got {:?}",
        game.winners()
    );
}

/// Assert that some event in a batch satisfies a predicate.
#[track_caller]
pub fn assert_event(events: &[GameEvent], expected: impl Fn(&GameEvent) -> bool) {
    assert!(
        events.iter().any(expected),
        "No matching event in {events:?}"
    );
}
