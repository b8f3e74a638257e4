//! Track geometry for the standard four-color board.
//!
//! Every token position is color-relative: `-1` is the base, `0..=50` walk
//! the shared 52-cell loop starting from the color's own entry cell,
//! `51..=55` climb the private home stretch, and `56` is the finished slot
//! in the center. Only shared-loop positions map to a global cell that
//! other colors can also occupy.

use crate::state::PlayerColor;

/// Number of cells on the shared loop.
pub const BOARD_PATH_LENGTH: u8 = 52;

/// First color-relative position inside the private home stretch.
pub const HOME_STRETCH_START: i8 = 51;

/// Color-relative position of the finished slot. Reached by exact count only.
pub const FINISH_LINE: i8 = 56;

/// Color-relative position of a token still in its base.
pub const BASE_POSITION: i8 = -1;

/// Tokens per color.
pub const TOKENS_PER_COLOR: usize = 4;

/// Rolling this many sixes in a row forfeits the turn.
pub const MAX_SIXES_STREAK: u8 = 3;

/// Global cells where a token can never be captured: the four entry cells
/// plus the four star cells.
pub const SAFE_CELLS: [u8; 8] = [0, 13, 26, 39, 8, 21, 34, 47];

/// Global cell where a color enters the shared loop.
pub fn start_offset(color: PlayerColor) -> u8 {
    match color {
        PlayerColor::Red => 0,
        PlayerColor::Green => 13,
        PlayerColor::Yellow => 26,
        PlayerColor::Blue => 39,
    }
}

/// Map a color-relative position to its global cell on the shared loop.
///
/// Returns `None` for positions off the loop (base, home stretch, finished):
/// tokens there cannot collide with anyone.
pub fn global_cell(color: PlayerColor, position: i8) -> Option<u8> {
    if !(0..HOME_STRETCH_START).contains(&position) {
        return None;
    }
    let cell = (start_offset(color) as i8 + position) % BOARD_PATH_LENGTH as i8;
    Some(cell as u8)
}

/// Whether a global cell protects its occupants from capture.
pub fn is_safe_cell(cell: u8) -> bool {
    SAFE_CELLS.contains(&cell)
}
