//! Game state: colors, tokens, and the whole-board snapshot.
//!
//! State is a plain value. Every transition in [`crate::engine`] replaces
//! fields on a single owned [`GameState`]; readers always see a complete,
//! coherent snapshot and never a half-applied move.

use crate::board::{BASE_POSITION, FINISH_LINE, TOKENS_PER_COLOR};
use crate::dice::DieFace;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Colors
// ============================================================================

/// The four seat colors, in fixed turn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerColor {
    Red,
    Green,
    Yellow,
    Blue,
}

impl PlayerColor {
    /// All colors in turn order.
    pub const ALL: [PlayerColor; 4] = [
        PlayerColor::Red,
        PlayerColor::Green,
        PlayerColor::Yellow,
        PlayerColor::Blue,
    ];

    /// Index into per-color arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The color after this one in the fixed cycle.
    pub fn next(self) -> PlayerColor {
        PlayerColor::ALL[(self.index() + 1) % PlayerColor::ALL.len()]
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerColor::Red => "Red",
            PlayerColor::Green => "Green",
            PlayerColor::Yellow => "Yellow",
            PlayerColor::Blue => "Blue",
        };
        write!(f, "{name}")
    }
}

// ============================================================================
// Tokens
// ============================================================================

/// Identifier of a token within its color, `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u8);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a token is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
    /// Waiting in the base; needs a six to launch.
    AtBase,
    /// On the shared loop or the home stretch.
    Active,
    /// Parked on the finished slot.
    Finished,
}

/// A single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    /// Color-relative position; see [`crate::board`] for the ranges.
    pub position: i8,
    pub status: TokenStatus,
}

impl Token {
    /// A fresh token waiting in the base.
    pub fn at_base(id: TokenId) -> Self {
        Self {
            id,
            position: BASE_POSITION,
            status: TokenStatus::AtBase,
        }
    }

    /// Whether this token has a legal move for the given face.
    ///
    /// Base tokens need a six; active tokens must not overshoot the
    /// finished slot; finished tokens never move again.
    pub fn is_movable(&self, face: DieFace) -> bool {
        match self.status {
            TokenStatus::Finished => false,
            TokenStatus::AtBase => face.is_six(),
            TokenStatus::Active => self.position + face.value() as i8 <= FINISH_LINE,
        }
    }

    /// Status and position agree: base at -1, finished at 56, active between.
    pub fn invariants_hold(&self) -> bool {
        match self.status {
            TokenStatus::AtBase => self.position == BASE_POSITION,
            TokenStatus::Active => (0..FINISH_LINE).contains(&self.position),
            TokenStatus::Finished => self.position == FINISH_LINE,
        }
    }
}

// ============================================================================
// Game state
// ============================================================================

/// Lifecycle of a playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Finished,
    /// Reserved for hosts that suspend play; transitions never set it.
    Paused,
}

/// Per-color aggregate counts for scoreboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub color: PlayerColor,
    pub tokens_finished: u8,
    pub tokens_active: u8,
    pub tokens_at_base: u8,
}

/// Complete board snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Whose roll or move is expected.
    pub current_turn: PlayerColor,

    /// The pending roll, if any. `Some` means a move is expected next.
    pub dice_value: Option<DieFace>,

    /// All sixteen tokens, indexed by [`PlayerColor::index`].
    pub tokens: [[Token; TOKENS_PER_COLOR]; 4],

    /// Consecutive sixes rolled by the current player this turn chain.
    pub sixes_streak: u8,

    /// Colors that brought all four tokens home, in finishing order.
    pub winners: Vec<PlayerColor>,

    pub status: GameStatus,

    /// Epoch milliseconds of the last accepted roll or move. Advisory.
    pub last_move_time: u64,
}

impl GameState {
    /// A fresh board: every token at base, no roll pending.
    pub fn new(first_turn: PlayerColor) -> Self {
        let tokens = std::array::from_fn(|_| {
            std::array::from_fn(|i| Token::at_base(TokenId(i as u8)))
        });
        Self {
            current_turn: first_turn,
            dice_value: None,
            tokens,
            sixes_streak: 0,
            winners: Vec::new(),
            status: GameStatus::Playing,
            last_move_time: 0,
        }
    }

    /// The four tokens of a color.
    pub fn tokens_of(&self, color: PlayerColor) -> &[Token; TOKENS_PER_COLOR] {
        &self.tokens[color.index()]
    }

    /// Look up one token by id.
    pub fn token(&self, color: PlayerColor, id: TokenId) -> Option<&Token> {
        self.tokens_of(color).iter().find(|t| t.id == id)
    }

    /// Ids of the tokens a color could move with the given face.
    pub fn movable_token_ids(&self, color: PlayerColor, face: DieFace) -> Vec<TokenId> {
        self.tokens_of(color)
            .iter()
            .filter(|t| t.is_movable(face))
            .map(|t| t.id)
            .collect()
    }

    /// Whether any token of a color could move with the given face.
    pub fn has_valid_moves(&self, color: PlayerColor, face: DieFace) -> bool {
        self.tokens_of(color).iter().any(|t| t.is_movable(face))
    }

    /// Whether a color has brought all four tokens home.
    pub fn has_finished(&self, color: PlayerColor) -> bool {
        self.tokens_of(color)
            .iter()
            .all(|t| t.status == TokenStatus::Finished)
    }

    /// Aggregate counts for one color.
    pub fn player_stats(&self, color: PlayerColor) -> PlayerStats {
        let tokens = self.tokens_of(color);
        let count = |status: TokenStatus| tokens.iter().filter(|t| t.status == status).count() as u8;
        PlayerStats {
            color,
            tokens_finished: count(TokenStatus::Finished),
            tokens_active: count(TokenStatus::Active),
            tokens_at_base: count(TokenStatus::AtBase),
        }
    }
}

/// Current time as epoch milliseconds.
pub fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
