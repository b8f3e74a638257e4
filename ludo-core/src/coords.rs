//! Board geometry for rendering hosts.
//!
//! Maps the color-relative track positions used by the rules onto the
//! 15x15 grid of a classic Ludo board. The rules engine never consults
//! this module; it exists so a host can draw the state.

use crate::board::{start_offset, BOARD_PATH_LENGTH, HOME_STRETCH_START};
use crate::state::{PlayerColor, Token, TokenStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a token should be drawn.
///
/// Base slots sit between grid lines, so coordinates are fractional.
pub fn visual_position(color: PlayerColor, token: &Token) -> Option<GridPos> {
    match token.status {
        TokenStatus::AtBase => BASE_SLOTS[color.index()].get(token.id.0 as usize).copied(),
        _ => {
            if token.position < 0 {
                return None;
            }
            COLOR_PATHS[color.index()]
                .get(token.position as usize)
                .copied()
        }
    }
}

/// The full walk for one color, indexed by track position.
///
/// Entry 0 is the color's start cell, entries 51 through 55 its home
/// stretch, entry 56 the center.
pub fn color_path(color: PlayerColor) -> &'static [GridPos] {
    &COLOR_PATHS[color.index()]
}

/// A cell on the 15x15 board grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPos {
    pub row: f32,
    pub col: f32,
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

const fn at(row: f32, col: f32) -> GridPos {
    GridPos { row, col }
}

// ============================================================================
// Tables
// ============================================================================

/// The shared loop, clockwise from Red's start cell.
pub const GLOBAL_PATH: [GridPos; BOARD_PATH_LENGTH as usize] = [
    // along the left arm and up to the top edge
    at(6.0, 1.0),
    at(6.0, 2.0),
    at(6.0, 3.0),
    at(6.0, 4.0),
    at(6.0, 5.0),
    at(5.0, 6.0),
    at(4.0, 6.0),
    at(3.0, 6.0),
    at(2.0, 6.0),
    at(1.0, 6.0),
    at(0.0, 6.0),
    at(0.0, 7.0),
    at(0.0, 8.0),
    // down the top arm and out to the right edge
    at(1.0, 8.0),
    at(2.0, 8.0),
    at(3.0, 8.0),
    at(4.0, 8.0),
    at(5.0, 8.0),
    at(6.0, 9.0),
    at(6.0, 10.0),
    at(6.0, 11.0),
    at(6.0, 12.0),
    at(6.0, 13.0),
    at(6.0, 14.0),
    at(7.0, 14.0),
    at(8.0, 14.0),
    // back along the right arm and down to the bottom edge
    at(8.0, 13.0),
    at(8.0, 12.0),
    at(8.0, 11.0),
    at(8.0, 10.0),
    at(8.0, 9.0),
    at(9.0, 8.0),
    at(10.0, 8.0),
    at(11.0, 8.0),
    at(12.0, 8.0),
    at(13.0, 8.0),
    at(14.0, 8.0),
    at(14.0, 7.0),
    at(14.0, 6.0),
    // up the bottom arm and around to Red's corner
    at(13.0, 6.0),
    at(12.0, 6.0),
    at(11.0, 6.0),
    at(10.0, 6.0),
    at(9.0, 6.0),
    at(8.0, 5.0),
    at(8.0, 4.0),
    at(8.0, 3.0),
    at(8.0, 2.0),
    at(8.0, 1.0),
    at(8.0, 0.0),
    at(7.0, 0.0),
    at(6.0, 0.0),
];

/// Home-stretch cells per color, outermost first.
pub const HOME_PATHS: [[GridPos; 5]; 4] = [
    // Red, from the left edge toward the center
    [
        at(7.0, 1.0),
        at(7.0, 2.0),
        at(7.0, 3.0),
        at(7.0, 4.0),
        at(7.0, 5.0),
    ],
    // Green, from the top edge
    [
        at(1.0, 7.0),
        at(2.0, 7.0),
        at(3.0, 7.0),
        at(4.0, 7.0),
        at(5.0, 7.0),
    ],
    // Yellow, from the right edge
    [
        at(7.0, 13.0),
        at(7.0, 12.0),
        at(7.0, 11.0),
        at(7.0, 10.0),
        at(7.0, 9.0),
    ],
    // Blue, from the bottom edge
    [
        at(13.0, 7.0),
        at(12.0, 7.0),
        at(11.0, 7.0),
        at(10.0, 7.0),
        at(9.0, 7.0),
    ],
];

/// Resting slots inside each color's yard, one per token.
pub const BASE_SLOTS: [[GridPos; 4]; 4] = [
    // Red, top-left yard
    [at(1.8, 1.8), at(1.8, 3.2), at(3.2, 1.8), at(3.2, 3.2)],
    // Green, top-right yard
    [at(1.8, 10.8), at(1.8, 12.2), at(3.2, 10.8), at(3.2, 12.2)],
    // Yellow, bottom-right yard
    [at(10.8, 10.8), at(10.8, 12.2), at(12.2, 10.8), at(12.2, 12.2)],
    // Blue, bottom-left yard
    [at(10.8, 1.8), at(10.8, 3.2), at(12.2, 1.8), at(12.2, 3.2)],
];

/// The shared finish cell in the middle of the board.
pub const CENTER: GridPos = at(7.0, 7.0);

lazy_static::lazy_static! {
    /// Per-color walks over the grid: 51 shared-loop cells entered at the
    /// color's start, five home-stretch cells, then the center.
    pub static ref COLOR_PATHS: [Vec<GridPos>; 4] = PlayerColor::ALL.map(|color| {
        let offset = start_offset(color) as usize;
        let mut path = Vec::with_capacity(HOME_STRETCH_START as usize + 6);
        for step in 0..HOME_STRETCH_START as usize {
            path.push(GLOBAL_PATH[(offset + step) % BOARD_PATH_LENGTH as usize]);
        }
        path.extend_from_slice(&HOME_PATHS[color.index()]);
        path.push(CENTER);
        path
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::FINISH_LINE;
    use crate::state::TokenId;

    #[test]
    fn test_shared_loop_has_no_duplicate_cells() {
        let mut seen = std::collections::HashSet::new();
        for pos in GLOBAL_PATH {
            assert!(seen.insert((pos.row as i32, pos.col as i32)), "duplicate at {pos}");
        }
    }

    #[test]
    fn test_walks_start_at_each_colors_corner() {
        assert_eq!(color_path(PlayerColor::Red)[0], at(6.0, 1.0));
        assert_eq!(color_path(PlayerColor::Green)[0], at(1.0, 8.0));
        assert_eq!(color_path(PlayerColor::Yellow)[0], at(8.0, 13.0));
        assert_eq!(color_path(PlayerColor::Blue)[0], at(13.0, 6.0));
    }

    #[test]
    fn test_every_walk_covers_the_full_track() {
        for color in PlayerColor::ALL {
            let path = color_path(color);
            assert_eq!(path.len(), FINISH_LINE as usize + 1);
            assert_eq!(path[HOME_STRETCH_START as usize], HOME_PATHS[color.index()][0]);
            assert_eq!(path[FINISH_LINE as usize], CENTER);
        }
    }

    #[test]
    fn test_walks_wrap_the_shared_loop() {
        // Blue enters at 39 and its 13th step lands on Red's start cell
        let blue = color_path(PlayerColor::Blue);
        assert_eq!(blue[13], GLOBAL_PATH[0]);
    }

    #[test]
    fn test_visual_position_of_each_token_state() {
        let resting = Token::at_base(TokenId(2));
        assert_eq!(
            visual_position(PlayerColor::Yellow, &resting),
            Some(at(12.2, 10.8))
        );

        let mut runner = Token::at_base(TokenId(0));
        runner.status = TokenStatus::Active;
        runner.position = 0;
        assert_eq!(
            visual_position(PlayerColor::Green, &runner),
            Some(at(1.0, 8.0))
        );

        runner.position = 53;
        assert_eq!(
            visual_position(PlayerColor::Red, &runner),
            Some(at(7.0, 3.0))
        );

        runner.status = TokenStatus::Finished;
        runner.position = FINISH_LINE;
        assert_eq!(visual_position(PlayerColor::Blue, &runner), Some(CENTER));
    }

    #[test]
    fn test_out_of_range_position_yields_nothing() {
        let mut stray = Token::at_base(TokenId(0));
        stray.status = TokenStatus::Active;
        stray.position = 57;
        assert_eq!(visual_position(PlayerColor::Red, &stray), None);
    }
}
