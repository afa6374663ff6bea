//! Winning pattern masks and the pattern catalog

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};

/// Pattern identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// 1×3 horizontal run
    LineThree,
    /// 1×4 horizontal run
    LineFour,
    /// 1×5 horizontal run
    LineFive,
    /// 3×1 vertical run
    ColumnThree,
    /// 3×3 top-left to bottom-right
    DiagonalDown,
    /// 3×3 bottom-left to top-right
    DiagonalUp,
    /// 3×3 four corners plus center
    Star,
    /// Full 3×3
    Block,
    /// Full 3×5
    Jackpot,
}

impl PatternKind {
    pub fn display_name(self) -> &'static str {
        match self {
            PatternKind::LineThree => "Three in a Row",
            PatternKind::LineFour => "Four in a Row",
            PatternKind::LineFive => "Five in a Row",
            PatternKind::ColumnThree => "Column",
            PatternKind::DiagonalDown => "Diagonal Down",
            PatternKind::DiagonalUp => "Diagonal Up",
            PatternKind::Star => "Star",
            PatternKind::Block => "Block",
            PatternKind::Jackpot => "Jackpot",
        }
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Pattern group tag, targeted by group-wide charms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternGroup {
    Horizontal,
    Vertical,
    Diagonal,
    Shape,
    Block,
    Jackpot,
}

impl PatternGroup {
    pub fn display_name(self) -> &'static str {
        match self {
            PatternGroup::Horizontal => "Horizontal",
            PatternGroup::Vertical => "Vertical",
            PatternGroup::Diagonal => "Diagonal",
            PatternGroup::Shape => "Shape",
            PatternGroup::Block => "Block",
            PatternGroup::Jackpot => "Jackpot",
        }
    }
}

impl std::fmt::Display for PatternGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Boolean mask of height × width, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMask")]
pub struct PatternMask {
    height: usize,
    width: usize,
    cells: Vec<bool>,
}

#[derive(Deserialize)]
struct RawMask {
    height: usize,
    width: usize,
    cells: Vec<bool>,
}

impl TryFrom<RawMask> for PatternMask {
    type Error = SlotError;

    fn try_from(raw: RawMask) -> SlotResult<Self> {
        if raw.height.checked_mul(raw.width) != Some(raw.cells.len()) {
            return Err(SlotError::Parse(format!(
                "mask of {}x{} has {} cells",
                raw.height,
                raw.width,
                raw.cells.len()
            )));
        }
        Ok(Self {
            height: raw.height,
            width: raw.width,
            cells: raw.cells,
        })
    }
}

impl PatternMask {
    /// Parse a mask drawn as text: `X` marks a cell, anything else leaves it out.
    ///
    /// Rows shorter than the widest row are padded with unmarked cells.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut cells = vec![false; height * width];
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                cells[r * width + c] = ch == 'X';
            }
        }
        Self {
            height,
            width,
            cells,
        }
    }

    /// Fully marked rectangle
    pub fn filled(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![true; height * width],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Is the cell at (row, column) part of the pattern
    pub fn is_set(&self, row: usize, column: usize) -> bool {
        row < self.height
            && column < self.width
            && self.cells.get(row * self.width + column).copied().unwrap_or(false)
    }

    /// Marked cells in row-major order
    pub fn marked_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height)
            .flat_map(move |r| (0..self.width).map(move |c| (r, c)))
            .filter(|&(r, c)| self.is_set(r, c))
    }

    /// Number of marked cells
    pub fn marked_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

/// A winning pattern definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinningPattern {
    pub kind: PatternKind,
    pub group: PatternGroup,
    pub name: String,
    /// Payout scaling, mutable via charms
    pub multiplier: f64,
    pub mask: PatternMask,
}

impl WinningPattern {
    pub fn new(kind: PatternKind, group: PatternGroup, multiplier: f64, mask: PatternMask) -> Self {
        Self {
            kind,
            group,
            name: kind.display_name().to_string(),
            multiplier,
            mask,
        }
    }
}

/// The fixed set of winning patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternCatalog {
    patterns: Vec<WinningPattern>,
}

impl PatternCatalog {
    pub fn new(patterns: Vec<WinningPattern>) -> Self {
        Self { patterns }
    }

    /// Standard nine-pattern catalog, smallest first
    pub fn standard() -> Self {
        Self {
            patterns: vec![
                WinningPattern::new(
                    PatternKind::LineThree,
                    PatternGroup::Horizontal,
                    1.0,
                    PatternMask::filled(1, 3),
                ),
                WinningPattern::new(
                    PatternKind::LineFour,
                    PatternGroup::Horizontal,
                    2.0,
                    PatternMask::filled(1, 4),
                ),
                WinningPattern::new(
                    PatternKind::LineFive,
                    PatternGroup::Horizontal,
                    4.0,
                    PatternMask::filled(1, 5),
                ),
                WinningPattern::new(
                    PatternKind::ColumnThree,
                    PatternGroup::Vertical,
                    1.5,
                    PatternMask::filled(3, 1),
                ),
                WinningPattern::new(
                    PatternKind::DiagonalDown,
                    PatternGroup::Diagonal,
                    2.5,
                    PatternMask::from_rows(&["X..", ".X.", "..X"]),
                ),
                WinningPattern::new(
                    PatternKind::DiagonalUp,
                    PatternGroup::Diagonal,
                    2.5,
                    PatternMask::from_rows(&["..X", ".X.", "X.."]),
                ),
                WinningPattern::new(
                    PatternKind::Star,
                    PatternGroup::Shape,
                    5.0,
                    PatternMask::from_rows(&["X.X", ".X.", "X.X"]),
                ),
                WinningPattern::new(
                    PatternKind::Block,
                    PatternGroup::Block,
                    10.0,
                    PatternMask::filled(3, 3),
                ),
                WinningPattern::new(
                    PatternKind::Jackpot,
                    PatternGroup::Jackpot,
                    50.0,
                    PatternMask::filled(3, 5),
                ),
            ],
        }
    }

    pub fn get(&self, kind: PatternKind) -> Option<&WinningPattern> {
        self.patterns.iter().find(|p| p.kind == kind)
    }

    pub fn get_mut(&mut self, kind: PatternKind) -> Option<&mut WinningPattern> {
        self.patterns.iter_mut().find(|p| p.kind == kind)
    }

    /// Patterns sharing a group tag
    pub fn group_mut(&mut self, group: PatternGroup) -> impl Iterator<Item = &mut WinningPattern> {
        self.patterns.iter_mut().filter(move |p| p.group == group)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WinningPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
