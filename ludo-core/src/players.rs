//! Seat configuration: who plays which color.
//!
//! A [`Roster`] fixes the set of colors that take turns for one
//! playthrough. It validates once at construction; the engine then trusts
//! it. The board always models all four colors, so an unseated color simply
//! never gets a turn and its tokens never leave the base.

use crate::state::PlayerColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from roster validation.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("a game needs at least 2 seats, got {0}")]
    TooFewSeats(usize),

    #[error("a game allows at most 4 seats, got {0}")]
    TooManySeats(usize),

    #[error("color {0} is seated more than once")]
    DuplicateColor(PlayerColor),

    #[error("player name must not be blank")]
    BlankName,
}

/// Who controls a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerKind {
    Human,
    /// Flagged for the host's automation; the engine treats it like any
    /// other seat.
    Ai,
}

/// One seat: a named player bound to a color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    pub color: PlayerColor,
    pub kind: PlayerKind,
}

impl PlayerConfig {
    pub fn human(name: impl Into<String>, color: PlayerColor) -> Self {
        Self {
            name: name.into(),
            color,
            kind: PlayerKind::Human,
        }
    }

    pub fn ai(name: impl Into<String>, color: PlayerColor) -> Self {
        Self {
            name: name.into(),
            color,
            kind: PlayerKind::Ai,
        }
    }
}

/// The validated 2-4 seats of one playthrough, held in turn order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    seats: Vec<PlayerConfig>,
}

impl Roster {
    /// Validate seats: 2 to 4 of them, unique colors, non-blank names.
    ///
    /// Seats are reordered into the fixed color cycle so that turn order
    /// does not depend on the order they were handed in.
    pub fn new(mut seats: Vec<PlayerConfig>) -> Result<Self, RosterError> {
        if seats.len() < 2 {
            return Err(RosterError::TooFewSeats(seats.len()));
        }
        if seats.len() > 4 {
            return Err(RosterError::TooManySeats(seats.len()));
        }
        for seat in &seats {
            if seat.name.trim().is_empty() {
                return Err(RosterError::BlankName);
            }
        }
        for (i, seat) in seats.iter().enumerate() {
            if seats[..i].iter().any(|s| s.color == seat.color) {
                return Err(RosterError::DuplicateColor(seat.color));
            }
        }
        seats.sort_by_key(|s| s.color.index());
        Ok(Self { seats })
    }

    /// Four human seats with default names, one per color.
    pub fn standard() -> Self {
        let seats = PlayerColor::ALL
            .iter()
            .enumerate()
            .map(|(i, &color)| PlayerConfig::human(format!("Player {}", i + 1), color))
            .collect();
        Self { seats }
    }

    /// All seats in turn order.
    pub fn seats(&self) -> &[PlayerConfig] {
        &self.seats
    }

    /// The seat holding a color, if any.
    pub fn seat(&self, color: PlayerColor) -> Option<&PlayerConfig> {
        self.seats.iter().find(|s| s.color == color)
    }

    /// Whether a color takes turns in this game.
    pub fn is_seated(&self, color: PlayerColor) -> bool {
        self.seat(color).is_some()
    }

    /// Seated colors in turn order.
    pub fn colors(&self) -> Vec<PlayerColor> {
        self.seats.iter().map(|s| s.color).collect()
    }

    /// The color that rolls first.
    pub fn first_turn(&self) -> PlayerColor {
        self.seats.first().map(|s| s.color).unwrap_or(PlayerColor::Red)
    }

    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_seats_valid() {
        let roster = Roster::new(vec![
            PlayerConfig::human("Amina", PlayerColor::Red),
            PlayerConfig::ai("Bot", PlayerColor::Yellow),
        ])
        .unwrap();
        assert_eq!(roster.seat_count(), 2);
        assert!(roster.is_seated(PlayerColor::Yellow));
        assert!(!roster.is_seated(PlayerColor::Green));
        assert_eq!(roster.first_turn(), PlayerColor::Red);
    }

    #[test]
    fn test_seat_count_bounds() {
        let too_few = Roster::new(vec![PlayerConfig::human("Solo", PlayerColor::Red)]);
        assert!(matches!(too_few, Err(RosterError::TooFewSeats(1))));

        let too_many = Roster::new(vec![
            PlayerConfig::human("A", PlayerColor::Red),
            PlayerConfig::human("B", PlayerColor::Green),
            PlayerConfig::human("C", PlayerColor::Yellow),
            PlayerConfig::human("D", PlayerColor::Blue),
            PlayerConfig::human("E", PlayerColor::Red),
        ]);
        assert!(matches!(too_many, Err(RosterError::TooManySeats(5))));
    }

    #[test]
    fn test_duplicate_color_rejected() {
        let result = Roster::new(vec![
            PlayerConfig::human("A", PlayerColor::Blue),
            PlayerConfig::human("B", PlayerColor::Blue),
        ]);
        assert!(matches!(
            result,
            Err(RosterError::DuplicateColor(PlayerColor::Blue))
        ));
    }

    #[test]
    fn test_blank_name_rejected() {
        let result = Roster::new(vec![
            PlayerConfig::human("  ", PlayerColor::Red),
            PlayerConfig::human("B", PlayerColor::Green),
        ]);
        assert!(matches!(result, Err(RosterError::BlankName)));
    }

    #[test]
    fn test_seats_reordered_into_turn_order() {
        let roster = Roster::new(vec![
            PlayerConfig::human("Late", PlayerColor::Blue),
            PlayerConfig::human("Early", PlayerColor::Green),
        ])
        .unwrap();
        assert_eq!(roster.first_turn(), PlayerColor::Green);
        assert_eq!(
            roster.colors(),
            vec![PlayerColor::Green, PlayerColor::Blue]
        );
    }

    #[test]
    fn test_standard_roster() {
        let roster = Roster::standard();
        assert_eq!(roster.seat_count(), 4);
        assert_eq!(roster.first_turn(), PlayerColor::Red);
        assert_eq!(roster.seat(PlayerColor::Blue).unwrap().name, "Player 4");
    }
}
