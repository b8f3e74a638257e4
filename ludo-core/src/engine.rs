//! The game engine: rolls, moves, and deferred follow-ups.
//!
//! [`GameEngine`] owns one [`GameState`] and applies every transition to
//! it. Operations return the [`GameEvent`] list they produced; a rejected
//! operation returns an empty list and changes nothing.
//!
//! The engine never sleeps and never spawns timers. A transition that
//! requires a delayed follow-up (a forced pass, an automatic move)
//! publishes a [`DeferredAction`] through [`GameEngine::pending_action`];
//! the host waits out the delay and hands the action back to
//! [`GameEngine::fire`]. Every accepted transition bumps an internal
//! revision, so firing an action scheduled before an intervening
//! transition is a no-op.
//!
//! # Example
//!
//! ```ignore
//! use ludo_core::{DieFace, GameEngine, Roster};
//!
//! let mut engine = GameEngine::new(Roster::standard());
//! for event in engine.roll_dice(DieFace::SIX) {
//!     println!("{event}");
//! }
//! let movable = engine.current_movable_tokens();
//! for event in engine.move_token(movable[0]) {
//!     println!("{event}");
//! }
//! ```

use crate::board::{global_cell, is_safe_cell, FINISH_LINE, HOME_STRETCH_START, MAX_SIXES_STREAK};
use crate::dice::DieFace;
use crate::events::{GameEvent, PassReason};
use crate::players::Roster;
use crate::state::{now_millis, GameState, GameStatus, PlayerColor, PlayerStats, TokenId, TokenStatus};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default delay before a forced pass is fired, in milliseconds.
pub const DEFAULT_FORCED_PASS_MS: u64 = 1000;

/// Default delay before a single-choice auto-move is fired, in milliseconds.
pub const DEFAULT_AUTO_MOVE_MS: u64 = 400;

/// When a playthrough ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WinRule {
    /// The game ends once every seated color has finished.
    #[default]
    AllFinish,
    /// The game ends once exactly one seated color remains unfinished.
    /// The remaining color is not recorded as a winner.
    AllButOne,
}

/// Tunables for one engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Delay before a scheduled forced pass fires.
    pub forced_pass_delay: Duration,

    /// Delay before a scheduled auto-move fires.
    pub auto_move_delay: Duration,

    /// Schedule an auto-move when a roll leaves exactly one movable token.
    pub auto_move_single: bool,

    pub win_rule: WinRule,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            forced_pass_delay: Duration::from_millis(DEFAULT_FORCED_PASS_MS),
            auto_move_delay: Duration::from_millis(DEFAULT_AUTO_MOVE_MS),
            auto_move_single: true,
            win_rule: WinRule::AllFinish,
        }
    }
}

impl EngineConfig {
    pub fn with_forced_pass_delay(mut self, delay: Duration) -> Self {
        self.forced_pass_delay = delay;
        self
    }

    pub fn with_auto_move_delay(mut self, delay: Duration) -> Self {
        self.auto_move_delay = delay;
        self
    }

    pub fn with_auto_move_single(mut self, enabled: bool) -> Self {
        self.auto_move_single = enabled;
        self
    }

    pub fn with_win_rule(mut self, rule: WinRule) -> Self {
        self.win_rule = rule;
        self
    }
}

// ============================================================================
// Deferred actions
// ============================================================================

/// Opaque freshness marker for a scheduled action.
///
/// Wraps the engine revision at scheduling time; any later accepted
/// transition invalidates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelToken(u64);

/// What a scheduled action will do when fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredKind {
    /// Revoke the current turn without a move.
    ForcedPass(PassReason),
    /// Move the only movable token.
    AutoMove(TokenId),
}

/// A delayed follow-up the host is expected to fire after `delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredAction {
    pub kind: DeferredKind,
    pub delay: Duration,
    token: CancelToken,
}

impl DeferredAction {
    /// The freshness marker this action was scheduled with.
    pub fn token(&self) -> CancelToken {
        self.token
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Rules engine for one playthrough.
pub struct GameEngine {
    roster: Roster,
    config: EngineConfig,
    state: GameState,
    revision: u64,
    pending: Option<DeferredAction>,
}

impl GameEngine {
    /// A fresh game with default configuration.
    pub fn new(roster: Roster) -> Self {
        Self::with_config(roster, EngineConfig::default())
    }

    /// A fresh game with explicit configuration.
    pub fn with_config(roster: Roster, config: EngineConfig) -> Self {
        let state = GameState::new(roster.first_turn());
        Self {
            roster,
            config,
            state,
            revision: 0,
            pending: None,
        }
    }

    /// Continue a previously saved game.
    ///
    /// Scheduled actions are not part of a snapshot, so the engine
    /// re-derives one from the restored state: a pending six with a
    /// cleared streak is the triple-six forfeit and its forced pass comes
    /// back; a pending roll with no legal move schedules a forced pass;
    /// a single-choice roll schedules an auto-move when the policy is
    /// enabled. Without this a game saved mid-delay could never advance
    /// again, or worse, play out a forfeited roll.
    pub fn resume(roster: Roster, state: GameState, config: EngineConfig) -> Self {
        let mut engine = Self {
            roster,
            config,
            state,
            revision: 0,
            pending: None,
        };

        if engine.state.status == GameStatus::Playing {
            if let Some(face) = engine.state.dice_value {
                // A pending six with streak 0 is the third consecutive six:
                // every playable pending six carries a streak of at least 1.
                if face.is_six() && engine.state.sixes_streak == 0 {
                    engine.schedule(
                        DeferredKind::ForcedPass(PassReason::TripleSix),
                        engine.config.forced_pass_delay,
                    );
                } else {
                    let movable = engine
                        .state
                        .movable_token_ids(engine.state.current_turn, face);
                    if movable.is_empty() {
                        engine.schedule(
                            DeferredKind::ForcedPass(PassReason::NoMoves),
                            engine.config.forced_pass_delay,
                        );
                    } else if movable.len() == 1 && engine.config.auto_move_single {
                        engine.schedule(
                            DeferredKind::AutoMove(movable[0]),
                            engine.config.auto_move_delay,
                        );
                    }
                }
            }
        }

        engine
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Monotonic count of accepted transitions.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The follow-up scheduled by the last transition, if still fresh.
    pub fn pending_action(&self) -> Option<&DeferredAction> {
        self.pending.as_ref()
    }

    /// Color whose roll or move is expected.
    pub fn current_color(&self) -> PlayerColor {
        self.state.current_turn
    }

    pub fn is_over(&self) -> bool {
        self.state.status == GameStatus::Finished
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Accept a rolled face for the current player.
    ///
    /// Rejected (empty list) while the game is not in progress or while a
    /// roll is already pending. A third consecutive six emits the roll but
    /// schedules a forced pass instead of granting a move; a roll with no
    /// legal move schedules a forced pass; a roll with exactly one movable
    /// token schedules an auto-move when the policy is enabled.
    pub fn roll_dice(&mut self, face: DieFace) -> Vec<GameEvent> {
        if self.state.status != GameStatus::Playing {
            debug!("roll rejected: game is not in progress");
            return Vec::new();
        }
        if let Some(pending) = self.state.dice_value {
            debug!("roll rejected: a roll of {pending} is already pending");
            return Vec::new();
        }

        self.bump();
        let color = self.state.current_turn;
        self.state.dice_value = Some(face);
        self.state.last_move_time = now_millis();

        if face.is_six() {
            self.state.sixes_streak += 1;
            if self.state.sixes_streak >= MAX_SIXES_STREAK {
                // No move is granted; the turn is lost after the delay.
                self.state.sixes_streak = 0;
                self.schedule(
                    DeferredKind::ForcedPass(PassReason::TripleSix),
                    self.config.forced_pass_delay,
                );
                debug!("{color} rolled a third six; forced pass scheduled");
                return vec![GameEvent::DiceRolled {
                    color,
                    face,
                    streak: MAX_SIXES_STREAK,
                }];
            }
        } else {
            self.state.sixes_streak = 0;
        }

        let events = vec![GameEvent::DiceRolled {
            color,
            face,
            streak: self.state.sixes_streak,
        }];

        let movable = self.state.movable_token_ids(color, face);
        if movable.is_empty() {
            self.schedule(
                DeferredKind::ForcedPass(PassReason::NoMoves),
                self.config.forced_pass_delay,
            );
            debug!("{color} rolled a {face} with no legal move; forced pass scheduled");
        } else if movable.len() == 1 && self.config.auto_move_single {
            self.schedule(DeferredKind::AutoMove(movable[0]), self.config.auto_move_delay);
            debug!("{color} has a single movable token; auto-move scheduled");
        }

        events
    }

    /// Move one of the current player's tokens by the pending roll.
    ///
    /// Rejected (empty list) when there is no pending roll, a forfeit is
    /// pending, the token id is unknown, or the move would be illegal.
    pub fn move_token(&mut self, token: TokenId) -> Vec<GameEvent> {
        if self.state.status != GameStatus::Playing {
            debug!("move rejected: game is not in progress");
            return Vec::new();
        }
        let Some(face) = self.state.dice_value else {
            debug!("move rejected: no roll is pending");
            return Vec::new();
        };
        if self.forfeit_pending() {
            debug!("move rejected: the turn is already forfeited");
            return Vec::new();
        }
        let color = self.state.current_turn;
        let Some(found) = self.state.token(color, token) else {
            debug!("move rejected: {color} has no token {token}");
            return Vec::new();
        };
        if !found.is_movable(face) {
            debug!("move rejected: {color} token {token} cannot move by {face}");
            return Vec::new();
        }

        self.bump();
        self.apply_move(color, token, face)
    }

    /// List the tokens a color could move with a face.
    ///
    /// Empty for the current player while a forfeit is pending, whatever
    /// the face would otherwise allow.
    pub fn movable_tokens(&self, color: PlayerColor, face: DieFace) -> Vec<TokenId> {
        if self.forfeit_pending() && color == self.state.current_turn {
            return Vec::new();
        }
        self.state.movable_token_ids(color, face)
    }

    /// The current player's movable tokens for the pending roll.
    pub fn current_movable_tokens(&self) -> Vec<TokenId> {
        match self.state.dice_value {
            Some(face) if self.state.status == GameStatus::Playing => {
                self.movable_tokens(self.state.current_turn, face)
            }
            _ => Vec::new(),
        }
    }

    /// Whether a color has any legal move for a face.
    pub fn has_valid_moves(&self, color: PlayerColor, face: DieFace) -> bool {
        !self.movable_tokens(color, face).is_empty()
    }

    /// Aggregate counts for one color.
    pub fn player_stats(&self, color: PlayerColor) -> PlayerStats {
        self.state.player_stats(color)
    }

    /// Execute a previously scheduled follow-up.
    ///
    /// A no-op unless `action` is exactly the one currently pending: any
    /// accepted transition since it was scheduled has invalidated it.
    pub fn fire(&mut self, action: &DeferredAction) -> Vec<GameEvent> {
        if self.pending.as_ref() != Some(action) {
            debug!("deferred {:?} ignored: stale", action.kind);
            return Vec::new();
        }

        match action.kind {
            DeferredKind::ForcedPass(reason) => {
                self.bump();
                let color = self.state.current_turn;
                let mut events = vec![GameEvent::TurnForfeited { color, reason }];
                self.advance_turn(&mut events);
                events
            }
            DeferredKind::AutoMove(token) => {
                let Some(face) = self.state.dice_value else {
                    debug!("deferred auto-move ignored: no roll pending");
                    return Vec::new();
                };
                self.bump();
                let color = self.state.current_turn;
                self.apply_move(color, token, face)
            }
        }
    }

    /// Start over: every token to its base, first seated color to roll.
    ///
    /// Always succeeds and cancels anything pending; returns no events.
    pub fn reset(&mut self) -> Vec<GameEvent> {
        self.bump();
        self.state = GameState::new(self.roster.first_turn());
        self.state.last_move_time = now_millis();
        info!("game reset");
        Vec::new()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Record an accepted transition: invalidates every scheduled action.
    fn bump(&mut self) {
        self.revision += 1;
        self.pending = None;
    }

    fn schedule(&mut self, kind: DeferredKind, delay: Duration) {
        self.pending = Some(DeferredAction {
            kind,
            delay,
            token: CancelToken(self.revision),
        });
    }

    fn forfeit_pending(&self) -> bool {
        matches!(
            self.pending,
            Some(DeferredAction {
                kind: DeferredKind::ForcedPass(_),
                ..
            })
        )
    }

    /// Apply a validated move: advance the token, resolve captures, record
    /// wins, then either grant a bonus roll or pass the turn.
    fn apply_move(&mut self, color: PlayerColor, token: TokenId, face: DieFace) -> Vec<GameEvent> {
        let mut events = Vec::new();

        let Some(index) = self
            .state
            .tokens_of(color)
            .iter()
            .position(|t| t.id == token)
        else {
            return events;
        };

        let from = self.state.tokens[color.index()][index].position;
        let launched = self.state.tokens[color.index()][index].status == TokenStatus::AtBase;
        let to = if launched { 0 } else { from + face.value() as i8 };
        let finished = to == FINISH_LINE;

        {
            let slot = &mut self.state.tokens[color.index()][index];
            slot.position = to;
            slot.status = if finished {
                TokenStatus::Finished
            } else {
                TokenStatus::Active
            };
        }

        if launched {
            events.push(GameEvent::TokenLaunched { color, token });
        } else {
            events.push(GameEvent::TokenMoved {
                color,
                token,
                from,
                to,
            });
        }

        let captured = self.resolve_captures(color, to, &mut events);

        if finished {
            events.push(GameEvent::TokenFinished { color, token });
        }

        let color_done = self.state.has_finished(color);
        if color_done && !self.state.winners.contains(&color) {
            self.state.winners.push(color);
            let rank = self.state.winners.len() as u8;
            events.push(GameEvent::PlayerWon { color, rank });
            info!("{color} finishes in place {rank}");
        }

        if self.win_rule_satisfied() {
            self.state.status = GameStatus::Finished;
            self.state.dice_value = None;
            events.push(GameEvent::GameOver {
                winners: self.state.winners.clone(),
            });
            info!("game over");
        } else if (face.is_six() || captured) && !color_done {
            // Streak survives a bonus roll so triple-six still trips.
            self.state.dice_value = None;
            events.push(GameEvent::BonusTurn { color });
        } else {
            self.advance_turn(&mut events);
        }

        self.state.last_move_time = now_millis();
        events
    }

    /// Send lone opposing tokens on the destination cell back to base.
    ///
    /// Only shared-loop, non-safe destinations capture. Each opposing
    /// color is resolved on its own: a single occupant goes home, a stack
    /// of two or more is protected.
    fn resolve_captures(
        &mut self,
        mover: PlayerColor,
        to: i8,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let Some(dest) = global_cell(mover, to) else {
            return false;
        };
        if is_safe_cell(dest) {
            return false;
        }

        let mut captured = false;
        for opponent in PlayerColor::ALL {
            if opponent == mover {
                continue;
            }
            let occupants: Vec<usize> = self
                .state
                .tokens_of(opponent)
                .iter()
                .enumerate()
                .filter(|(_, t)| {
                    t.status == TokenStatus::Active
                        && t.position < HOME_STRETCH_START
                        && global_cell(opponent, t.position) == Some(dest)
                })
                .map(|(i, _)| i)
                .collect();

            if let [lone] = occupants[..] {
                let victim = &mut self.state.tokens[opponent.index()][lone];
                let victim_id = victim.id;
                *victim = crate::state::Token::at_base(victim_id);
                events.push(GameEvent::TokenCaptured {
                    color: opponent,
                    token: victim_id,
                    by: mover,
                    cell: dest,
                });
                captured = true;
            }
        }
        captured
    }

    fn win_rule_satisfied(&self) -> bool {
        let unfinished = self
            .roster
            .colors()
            .into_iter()
            .filter(|&c| !self.state.has_finished(c))
            .count();
        match self.config.win_rule {
            WinRule::AllFinish => unfinished == 0,
            WinRule::AllButOne => unfinished <= 1,
        }
    }

    /// Hand the turn to the next seated, unfinished color.
    fn advance_turn(&mut self, events: &mut Vec<GameEvent>) {
        let from = self.state.current_turn;
        let mut to = from;
        for _ in 0..PlayerColor::ALL.len() {
            to = to.next();
            if self.roster.is_seated(to) && !self.state.has_finished(to) {
                break;
            }
        }
        self.state.current_turn = to;
        self.state.dice_value = None;
        self.state.sixes_streak = 0;
        debug!("turn passes from {from} to {to}");
        events.push(GameEvent::TurnPassed { from, to });
    }
}
