//! Board of placed glyphs

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::glyphs::GlyphKind;

/// One glyph placed on a board cell for a single spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphInstance {
    pub glyph: GlyphKind,
    pub row: usize,
    pub column: usize,
    /// Part of at least one detected win
    pub is_winning: bool,
    /// Largest multiplier among the patterns covering this cell; starts at 1
    pub winning_multiplier: f64,
}

impl GlyphInstance {
    pub fn new(glyph: GlyphKind, row: usize, column: usize) -> Self {
        Self {
            glyph,
            row,
            column,
            is_winning: false,
            winning_multiplier: 1.0,
        }
    }

    /// Flag as winning; overlapping patterns keep the larger multiplier
    pub fn mark_winning(&mut self, multiplier: f64) {
        self.is_winning = true;
        self.winning_multiplier = self.winning_multiplier.max(multiplier);
    }
}

/// Rows × columns matrix of glyph instances, stored row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    rows: usize,
    columns: usize,
    cells: Vec<GlyphInstance>,
}

/// Board as stored, before the shape is checked
#[derive(Deserialize)]
struct RawBoard {
    rows: usize,
    columns: usize,
    cells: Vec<GlyphInstance>,
}

impl TryFrom<RawBoard> for Board {
    type Error = SlotError;

    fn try_from(raw: RawBoard) -> SlotResult<Self> {
        let expected = raw.rows.checked_mul(raw.columns).unwrap_or(0);
        if expected == 0 || raw.cells.len() != expected {
            return Err(SlotError::InvalidBoard(format!(
                "{} cells for a {}x{} board",
                raw.cells.len(),
                raw.rows,
                raw.columns
            )));
        }
        if let Some(i) = raw
            .cells
            .iter()
            .enumerate()
            .position(|(i, cell)| (cell.row, cell.column) != (i / raw.columns, i % raw.columns))
        {
            return Err(SlotError::InvalidBoard(format!(
                "cell {i} is out of place at ({}, {})",
                raw.cells[i].row, raw.cells[i].column
            )));
        }
        Ok(Self {
            rows: raw.rows,
            columns: raw.columns,
            cells: raw.cells,
        })
    }
}

impl Board {
    /// Build from row-major glyph rows
    pub fn from_rows(rows: Vec<Vec<GlyphKind>>) -> SlotResult<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(SlotError::InvalidBoard("board has no cells".into()));
        }
        if let Some(bad) = rows.iter().position(|r| r.len() != width) {
            return Err(SlotError::InvalidBoard(format!(
                "row {bad} has {} cells, expected {width}",
                rows[bad].len()
            )));
        }

        let cells = rows
            .into_iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.into_iter()
                    .enumerate()
                    .map(move |(c, glyph)| GlyphInstance::new(glyph, r, c))
            })
            .collect();

        Ok(Self {
            rows: height,
            columns: width,
            cells,
        })
    }

    /// Build from reel columns (top to bottom), as the reel layer reports them.
    ///
    /// Transposes into row-major order for matching.
    pub fn from_columns(columns: Vec<Vec<GlyphKind>>) -> SlotResult<Self> {
        let width = columns.len();
        let height = columns.first().map(Vec::len).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(SlotError::InvalidBoard("board has no cells".into()));
        }
        if let Some(bad) = columns.iter().position(|c| c.len() != height) {
            return Err(SlotError::InvalidBoard(format!(
                "reel {bad} has {} glyphs, expected {height}",
                columns[bad].len()
            )));
        }

        let rows = (0..height)
            .map(|r| columns.iter().map(|col| col[r]).collect())
            .collect();
        Self::from_rows(rows)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&GlyphInstance> {
        if row < self.rows && column < self.columns {
            self.cells.get(row * self.columns + column)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, row: usize, column: usize) -> Option<&mut GlyphInstance> {
        if row < self.rows && column < self.columns {
            self.cells.get_mut(row * self.columns + column)
        } else {
            None
        }
    }

    /// Glyph at a cell
    pub fn glyph_at(&self, row: usize, column: usize) -> Option<GlyphKind> {
        self.get(row, column).map(|g| g.glyph)
    }

    /// All instances, row-major
    pub fn cells(&self) -> &[GlyphInstance] {
        &self.cells
    }

    /// Reel columns (top to bottom) for the render layer
    pub fn to_columns(&self) -> Vec<Vec<GlyphKind>> {
        (0..self.columns)
            .map(|c| (0..self.rows).map(|r| self.cells[r * self.columns + c].glyph).collect())
            .collect()
    }

    /// Column-major glyph ids for stage payloads
    pub fn to_id_columns(&self) -> Vec<Vec<u32>> {
        self.to_columns()
            .into_iter()
            .map(|col| col.into_iter().map(GlyphKind::id).collect())
            .collect()
    }

    /// Instances flagged by the detector
    pub fn winning_cells(&self) -> impl Iterator<Item = &GlyphInstance> {
        self.cells.iter().filter(|g| g.is_winning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GlyphKind::*;

    #[test]
    fn test_from_columns_transposes() {
        let board = Board::from_columns(vec![
            vec![Cherry, Lemon, Plum],
            vec![Bell, Bar, Seven],
        ])
        .unwrap();

        assert_eq!(board.rows(), 3);
        assert_eq!(board.columns(), 2);
        assert_eq!(board.glyph_at(0, 0), Some(Cherry));
        assert_eq!(board.glyph_at(0, 1), Some(Bell));
        assert_eq!(board.glyph_at(2, 1), Some(Seven));

        let cell = board.get(1, 1).unwrap();
        assert_eq!((cell.row, cell.column), (1, 1));
        assert!(!cell.is_winning);
        assert_eq!(cell.winning_multiplier, 1.0);
    }

    #[test]
    fn test_columns_round_trip() {
        let columns = vec![vec![Cherry, Lemon], vec![Bell, Bar], vec![Plum, Seven]];
        let board = Board::from_columns(columns.clone()).unwrap();
        assert_eq!(board.to_columns(), columns);
        assert_eq!(board.to_id_columns()[2], vec![Plum.id(), Seven.id()]);
    }

    #[test]
    fn test_deserialize_rejects_inconsistent_shape() {
        let empty = r#"{"rows":3,"columns":5,"cells":[]}"#;
        assert!(serde_json::from_str::<Board>(empty).is_err());

        let board = Board::from_columns(vec![vec![Cherry, Lemon], vec![Bell, Bar]]).unwrap();
        let mut value = serde_json::to_value(&board).unwrap();
        value["cells"][0]["row"] = serde_json::json!(1);
        assert!(serde_json::from_value::<Board>(value).is_err());

        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(serde_json::from_str::<Board>(&json).unwrap(), board);
    }

    #[test]
    fn test_ragged_input_rejected() {
        let result = Board::from_columns(vec![vec![Cherry, Lemon], vec![Bell]]);
        assert!(matches!(result, Err(SlotError::InvalidBoard(_))));
        assert!(Board::from_rows(Vec::new()).is_err());
    }

    #[test]
    fn test_mark_winning_keeps_maximum() {
        let mut cell = GlyphInstance::new(Seven, 0, 0);
        cell.mark_winning(5.0);
        cell.mark_winning(2.0);
        assert!(cell.is_winning);
        assert_eq!(cell.winning_multiplier, 5.0);
    }
}
