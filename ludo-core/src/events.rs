//! Events describing what a transition did.
//!
//! Engine operations return the deltas they applied as [`GameEvent`]
//! values. Hosts replay them into sound, animation, or logs; an empty
//! event list means the operation was rejected and nothing changed.

use crate::dice::DieFace;
use crate::state::{PlayerColor, TokenId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a turn was taken away without a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassReason {
    /// Third consecutive six.
    TripleSix,
    /// The roll left no legal move.
    NoMoves,
}

/// A single applied state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A roll was accepted. `streak` counts consecutive sixes including
    /// this one.
    DiceRolled {
        color: PlayerColor,
        face: DieFace,
        streak: u8,
    },

    /// The current player's turn was revoked before any move.
    TurnForfeited {
        color: PlayerColor,
        reason: PassReason,
    },

    /// A token left the base onto the color's entry cell.
    TokenLaunched { color: PlayerColor, token: TokenId },

    /// A token advanced along its path.
    TokenMoved {
        color: PlayerColor,
        token: TokenId,
        from: i8,
        to: i8,
    },

    /// A lone token was sent back to its base.
    TokenCaptured {
        /// Owner of the captured token.
        color: PlayerColor,
        token: TokenId,
        /// Color that landed on it.
        by: PlayerColor,
        /// Global cell where it happened.
        cell: u8,
    },

    /// A token reached the finished slot by exact count.
    TokenFinished { color: PlayerColor, token: TokenId },

    /// Same player rolls again (rolled a six or captured).
    BonusTurn { color: PlayerColor },

    /// The turn moved to the next eligible color.
    TurnPassed { from: PlayerColor, to: PlayerColor },

    /// A color brought all four tokens home. Rank is 1-based.
    PlayerWon { color: PlayerColor, rank: u8 },

    /// The win rule was satisfied; no further operations are accepted.
    GameOver { winners: Vec<PlayerColor> },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::DiceRolled { color, face, .. } => write!(f, "{color} rolled a {face}"),
            GameEvent::TurnForfeited { color, reason } => match reason {
                PassReason::TripleSix => write!(f, "{color} forfeits after three sixes"),
                PassReason::NoMoves => write!(f, "{color} has no legal move"),
            },
            GameEvent::TokenLaunched { color, token } => {
                write!(f, "{color} launches token {token}")
            }
            GameEvent::TokenMoved {
                color,
                token,
                from,
                to,
            } => write!(f, "{color} moves token {token} from {from} to {to}"),
            GameEvent::TokenCaptured {
                color,
                token,
                by,
                cell,
            } => write!(f, "{by} captures {color} token {token} on cell {cell}"),
            GameEvent::TokenFinished { color, token } => {
                write!(f, "{color} token {token} reaches home")
            }
            GameEvent::BonusTurn { color } => write!(f, "{color} rolls again"),
            GameEvent::TurnPassed { from, to } => write!(f, "turn passes from {from} to {to}"),
            GameEvent::PlayerWon { color, rank } => {
                write!(f, "{color} finishes in place {rank}")
            }
            GameEvent::GameOver { winners } => {
                let order = winners
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "game over: {order}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        let rolled = GameEvent::DiceRolled {
            color: PlayerColor::Red,
            face: DieFace::SIX,
            streak: 1,
        };
        assert_eq!(rolled.to_string(), "Red rolled a 6");

        let captured = GameEvent::TokenCaptured {
            color: PlayerColor::Green,
            token: TokenId(2),
            by: PlayerColor::Red,
            cell: 10,
        };
        assert_eq!(captured.to_string(), "Red captures Green token 2 on cell 10");

        let over = GameEvent::GameOver {
            winners: vec![PlayerColor::Blue, PlayerColor::Red],
        };
        assert_eq!(over.to_string(), "game over: Blue, Red");
    }
}
