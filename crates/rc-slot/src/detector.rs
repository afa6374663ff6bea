//! Sliding-window pattern matching

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::patterns::{PatternCatalog, PatternGroup, PatternKind, PatternMask, WinningPattern};

/// One concrete placement of a pattern whose masked cells share a glyph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub pattern: PatternKind,
    pub group: PatternGroup,
    /// Pattern multiplier at detection time
    pub multiplier: f64,
    /// Matched (row, column) positions in row-major scan order
    pub cells: Vec<(usize, usize)>,
}

/// Every top-left origin at which an `height × width` window fits the board.
///
/// Empty when the window is larger than the board in either dimension.
pub fn window_origins(
    board_rows: usize,
    board_columns: usize,
    height: usize,
    width: usize,
) -> impl Iterator<Item = (usize, usize)> + Clone {
    let row_positions = fitting_positions(board_rows, height);
    let column_positions = fitting_positions(board_columns, width);
    (0..row_positions).flat_map(move |r| (0..column_positions).map(move |c| (r, c)))
}

fn fitting_positions(board_len: usize, window_len: usize) -> usize {
    if window_len == 0 || window_len > board_len {
        0
    } else {
        board_len - window_len + 1
    }
}

/// Check one window. The first masked cell fixes the reference glyph; any
/// later masked cell with another glyph rejects the window.
fn match_window(board: &Board, mask: &PatternMask, origin: (usize, usize)) -> Option<Vec<(usize, usize)>> {
    let mut reference = None;
    let mut cells = Vec::with_capacity(mask.marked_count());

    for (mr, mc) in mask.marked_cells() {
        let position = (origin.0 + mr, origin.1 + mc);
        let glyph = board.glyph_at(position.0, position.1)?;
        match reference {
            None => reference = Some(glyph),
            Some(expected) if expected != glyph => return None,
            Some(_) => {}
        }
        cells.push(position);
    }

    if cells.is_empty() { None } else { Some(cells) }
}

/// All matches of one pattern, in window-origin order
pub fn find_pattern_matches(board: &Board, pattern: &WinningPattern) -> Vec<PatternMatch> {
    window_origins(
        board.rows(),
        board.columns(),
        pattern.mask.height(),
        pattern.mask.width(),
    )
    .filter_map(|origin| match_window(board, &pattern.mask, origin))
    .map(|cells| PatternMatch {
        pattern: pattern.kind,
        group: pattern.group,
        multiplier: pattern.multiplier,
        cells,
    })
    .collect()
}

/// All matches of every pattern without touching the board
pub fn find_matches(board: &Board, patterns: &PatternCatalog) -> Vec<PatternMatch> {
    patterns
        .iter()
        .flat_map(|pattern| find_pattern_matches(board, pattern))
        .collect()
}

/// Detect every match and flag the matched instances.
///
/// Each matched cell is marked winning and its `winning_multiplier` raised to
/// the pattern multiplier if larger; overlaps never sum.
pub fn detect_wins(board: &mut Board, patterns: &PatternCatalog) -> Vec<PatternMatch> {
    let matches = find_matches(board, patterns);
    for m in &matches {
        for &(row, column) in &m.cells {
            if let Some(cell) = board.get_mut(row, column) {
                cell.mark_winning(m.multiplier);
            }
        }
    }
    matches
}
